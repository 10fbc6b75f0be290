//! Declarative description of the results panel.
//!
//! Nothing here touches a presentation layer: [`render_page`] turns browser
//! state into a [`ResultsView`] tree that any front end can bind.

use crate::browser::BrowserViewState;
use crate::paging::{page_range, page_size, total_pages, ScreenClass, ViewMode};
use crate::record::ListingRecord;

pub const NO_RESULTS_MESSAGE: &str =
    "No matching units found. Try adjusting your search criteria.";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load units.";

#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    /// Fetch in flight; the results region is hidden behind a spinner.
    Loading,
    /// Terminal fetch failure.
    Failed { message: String },
    /// Nothing to show. Pagination controls are removed entirely.
    Empty { message: String },
    Page(PageView),
}

impl ResultsView {
    pub fn page(&self) -> Option<&PageView> {
        match self {
            ResultsView::Page(p) => Some(p),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub page: usize,
    pub total_pages: usize,
    /// "Page X of Y".
    pub indicator: String,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub layout: Layout,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    Grid { columns: u8 },
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub arrangement: Arrangement,
    pub gap_px: u32,
    /// `None` means full viewport width.
    pub card_max_width_px: Option<u32>,
}

impl Layout {
    pub fn for_mode(mode: ViewMode, screen: ScreenClass) -> Self {
        match (mode, screen) {
            (ViewMode::Grid, ScreenClass::Desktop) => Layout {
                arrangement: Arrangement::Grid { columns: 4 },
                gap_px: 32,
                card_max_width_px: None,
            },
            (ViewMode::Grid, ScreenClass::Mobile) => Layout {
                arrangement: Arrangement::Grid { columns: 2 },
                gap_px: 10,
                card_max_width_px: None,
            },
            (ViewMode::List, ScreenClass::Desktop) => Layout {
                arrangement: Arrangement::Column,
                gap_px: 16,
                card_max_width_px: Some(700),
            },
            (ViewMode::List, ScreenClass::Mobile) => Layout {
                arrangement: Arrangement::Column,
                gap_px: 10,
                card_max_width_px: None,
            },
        }
    }
}

/// One listing card. Missing numbers render as a dash.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub location: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub garden: String,
    pub price: String,
}

impl Card {
    pub fn from_record(r: &ListingRecord) -> Self {
        Card {
            id: r.id.clone(),
            title: r.display_name().unwrap_or("-").to_string(),
            location: r.location.as_ref().map(|l| l.label()).unwrap_or_default(),
            bedrooms: format!("{} BR", format_count(r.bedrooms)),
            bathrooms: format!("{} BA", format_count(r.bathrooms)),
            garden: match r.garden_area {
                Some(area) if area > 0.0 => format!("{}m² Garden", format_number(area)),
                _ => "No Garden".to_string(),
            },
            price: format!("${}", r.price.map(format_number).unwrap_or_else(|| "-".into())),
        }
    }
}

/// Renders the current page of `visible`.
///
/// `state.current_page` is expected to be in range already; if it is not,
/// the first page is shown instead.
pub fn render_page(
    state: &BrowserViewState,
    visible: &[&ListingRecord],
    viewport_width: u32,
) -> ResultsView {
    if visible.is_empty() {
        return ResultsView::Empty {
            message: NO_RESULTS_MESSAGE.to_string(),
        };
    }

    let size = page_size(state.view_mode, viewport_width);
    let total = total_pages(visible.len(), size);
    let page = if (1..=total).contains(&state.current_page) {
        state.current_page
    } else {
        1
    };

    let cards = visible[page_range(page, size, visible.len())]
        .iter()
        .map(|r| Card::from_record(r))
        .collect();

    ResultsView::Page(PageView {
        page,
        total_pages: total,
        indicator: format!("Page {page} of {total}"),
        prev_enabled: page > 1,
        next_enabled: page < total,
        layout: Layout::for_mode(state.view_mode, ScreenClass::from_width(viewport_width)),
        cards,
    })
}

fn format_count(v: Option<f64>) -> String {
    v.map(format_number).unwrap_or_else(|| "-".into())
}

/// Groups thousands with commas and keeps at most two decimals.
pub fn format_number(v: f64) -> String {
    let negative = v < 0.0;
    let cents = (v.abs() * 100.0).round() as u128;
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative && cents > 0 { "-" } else { "" };
    match frac {
        0 => format!("{sign}{grouped}"),
        f if f % 10 == 0 => format!("{sign}{grouped}.{}", f / 10),
        f => format!("{sign}{grouped}.{f:02}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;
    use crate::record::Location;

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1000.0), "1,000");
        assert_eq!(format_number(1_250_000.0), "1,250,000");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(1234.56), "1,234.56");
        assert_eq!(format_number(-4200.0), "-4,200");
    }

    #[test]
    fn card_placeholders() {
        let r = ListingRecord {
            id: "a1".into(),
            name: Some("U-0001".into()),
            ..Default::default()
        };
        let card = Card::from_record(&r);
        assert_eq!(card.title, "U-0001");
        assert_eq!(card.bedrooms, "- BR");
        assert_eq!(card.bathrooms, "- BA");
        assert_eq!(card.garden, "No Garden");
        assert_eq!(card.price, "$-");
        assert_eq!(card.location, "");
    }

    #[test]
    fn card_full() {
        let r = ListingRecord {
            id: "a2".into(),
            complete_name: Some("Palm Residence".into()),
            bedrooms: Some(3.0),
            bathrooms: Some(2.0),
            garden_area: Some(120.0),
            price: Some(3_400_000.0),
            location: Some(Location::Coordinates(Coordinates::new(30.0444, 31.2357))),
            ..Default::default()
        };
        let card = Card::from_record(&r);
        assert_eq!(card.title, "Palm Residence");
        assert_eq!(card.bedrooms, "3 BR");
        assert_eq!(card.garden, "120m² Garden");
        assert_eq!(card.price, "$3,400,000");
        assert_eq!(card.location, "30.04440, 31.23570");
    }

    #[test]
    fn layouts() {
        let l = Layout::for_mode(ViewMode::Grid, ScreenClass::Mobile);
        assert_eq!(l.arrangement, Arrangement::Grid { columns: 2 });
        let l = Layout::for_mode(ViewMode::List, ScreenClass::Desktop);
        assert_eq!(l.card_max_width_px, Some(700));
    }
}
