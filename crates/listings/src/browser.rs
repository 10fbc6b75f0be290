//! The listing browser: owns the fetched set, view mode, page and filter.
//!
//! Every operation mutates state and reports how the panel should refresh
//! ([`Refresh`]) plus an optional toast. Rendering is a separate, pure step
//! ([`ListingBrowser::render`]).

use crate::error::FetchError;
use crate::filter::FilterCriteria;
use crate::paging::{page_size, total_pages, ViewMode};
use crate::record::ListingRecord;
use crate::view::{render_page, ResultsView, LOAD_FAILED_MESSAGE};

/// Where listings come from. The browser fetches exactly once at startup.
pub trait UnitSource {
    fn fetch_units(&self) -> Result<Vec<ListingRecord>, FetchError>;
}

impl<F> UnitSource for F
where
    F: Fn() -> Result<Vec<ListingRecord>, FetchError>,
{
    fn fetch_units(&self) -> Result<Vec<ListingRecord>, FetchError> {
        self()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(FetchError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A transient, non-blocking notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: ToastKind,
    pub message: String,
}

impl Notification {
    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

/// How the results region should pick up the new content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Fade out, swap while hidden, fade in.
    Fade,
    /// Swap in place.
    Direct,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowserUpdate {
    pub refresh: Refresh,
    pub notification: Option<Notification>,
}

impl BrowserUpdate {
    fn new(refresh: Refresh, notification: Option<Notification>) -> Self {
        Self {
            refresh,
            notification,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BrowserViewState {
    pub view_mode: ViewMode,
    /// 1-based.
    pub current_page: usize,
    pub active_filter: Option<FilterCriteria>,
}

#[derive(Debug)]
pub struct ListingBrowser {
    records: Vec<ListingRecord>,
    load: LoadState,
    state: BrowserViewState,
    viewport_width: u32,
}

impl ListingBrowser {
    pub fn new(viewport_width: u32) -> Self {
        Self {
            records: Vec::new(),
            load: LoadState::Idle,
            state: BrowserViewState {
                current_page: 1,
                ..Default::default()
            },
            viewport_width,
        }
    }

    pub fn state(&self) -> &BrowserViewState {
        &self.state
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    /// Synchronous load from `source`.
    pub fn load(&mut self, source: &dyn UnitSource) -> BrowserUpdate {
        self.begin_load();
        self.finish_load(source.fetch_units())
    }

    /// Marks a fetch as in flight. Only an idle browser starts loading; the
    /// set is fetched once per page lifetime.
    pub fn begin_load(&mut self) {
        if self.load == LoadState::Idle {
            log::info!("Fetching listing units");
            self.load = LoadState::Loading;
        }
    }

    pub fn finish_load(&mut self, result: Result<Vec<ListingRecord>, FetchError>) -> BrowserUpdate {
        match result {
            Ok(records) => {
                log::info!("Loaded {} listing units", records.len());
                self.records = records;
                self.load = LoadState::Ready;
                self.state.current_page = 1;
                let note =
                    Notification::success(format!("Loaded {} available units", self.records.len()));
                BrowserUpdate::new(Refresh::Direct, Some(note))
            }
            Err(e) => {
                log::error!("Fetch error: {}", e);
                self.load = LoadState::Failed(e);
                BrowserUpdate::new(
                    Refresh::Direct,
                    Some(Notification::error(
                        "Failed to load units. Please try again later.",
                    )),
                )
            }
        }
    }

    /// Records passing the active filter, in fetch order.
    pub fn visible(&self) -> Vec<&ListingRecord> {
        match &self.state.active_filter {
            Some(criteria) => criteria.apply(&self.records),
            None => self.records.iter().collect(),
        }
    }

    pub fn page_size(&self) -> usize {
        page_size(self.state.view_mode, self.viewport_width)
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.visible().len(), self.page_size())
    }

    pub fn apply_filter(&mut self, criteria: FilterCriteria) -> BrowserUpdate {
        self.state.active_filter = (!criteria.is_empty()).then_some(criteria);
        self.state.current_page = 1;

        let found = self.visible().len();
        log::info!(
            "Applied filter {:?}: {} matching units",
            self.state.active_filter,
            found
        );
        let note = if found > 0 {
            Notification::success(format!("Found {found} matching units"))
        } else {
            Notification::error(format!("Found {found} matching units"))
        };
        BrowserUpdate::new(Refresh::Fade, Some(note))
    }

    pub fn clear_filter(&mut self) -> BrowserUpdate {
        self.state.active_filter = None;
        self.state.current_page = 1;
        log::info!("Cleared filter");
        BrowserUpdate::new(
            Refresh::Fade,
            Some(Notification::success("Showing all available units")),
        )
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) -> BrowserUpdate {
        log::debug!("View mode {:?} -> {:?}", self.state.view_mode, mode);
        self.state.view_mode = mode;
        self.state.current_page = 1;
        BrowserUpdate::new(Refresh::Fade, None)
    }

    /// Moves `delta` pages, clamped to `[1, total_pages]`.
    pub fn go_to_page(&mut self, delta: isize) -> BrowserUpdate {
        let total = self.total_pages();
        let target = self.state.current_page.saturating_add_signed(delta);
        self.state.current_page = target.clamp(1, total);
        log::debug!("Page {} of {}", self.state.current_page, total);
        BrowserUpdate::new(Refresh::Direct, None)
    }

    /// Viewport resize. Page size may change, so an out-of-range page is
    /// reset to the first one.
    pub fn set_viewport_width(&mut self, width: u32) -> BrowserUpdate {
        self.viewport_width = width;
        if self.state.current_page > self.total_pages() {
            self.state.current_page = 1;
        }
        BrowserUpdate::new(Refresh::Direct, None)
    }

    /// Pure view of the current state.
    pub fn render(&self) -> ResultsView {
        match &self.load {
            LoadState::Idle | LoadState::Loading => ResultsView::Loading,
            LoadState::Failed(_) => ResultsView::Failed {
                message: LOAD_FAILED_MESSAGE.to_string(),
            },
            LoadState::Ready => render_page(&self.state, &self.visible(), self.viewport_width),
        }
    }
}
