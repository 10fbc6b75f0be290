//! Search criteria for the results panel.
//!
//! All provided criteria are combined with logical AND. A criterion that
//! constrains a field the record does not carry excludes the record; there is
//! no partial-match scoring.

use crate::error::CriteriaError;
use crate::geo::{haversine_km, Coordinates};
use crate::record::ListingRecord;
use chrono::NaiveDate;

/// Search radius for coordinate queries (kilometres, inclusive).
pub const AREA_RADIUS_KM: f64 = 10.0;

/// Slack on the radius comparison so a point placed exactly on the circle
/// is not lost to floating-point error in the haversine.
const RADIUS_TOLERANCE_KM: f64 = 1e-9;

/// The "area" box accepts either a `lat,lng` pair or free text.
#[derive(Debug, Clone, PartialEq)]
pub enum AreaQuery {
    /// Keep records whose coordinates lie within `radius_km` of `center`.
    Near { center: Coordinates, radius_km: f64 },
    /// Case-insensitive substring of the display name. Stored lowercased.
    NameContains(String),
}

impl AreaQuery {
    /// Interprets raw form input. Blank input yields `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        let parts: Vec<&str> = needle.split(',').collect();
        if let [lat, lng] = parts.as_slice() {
            if let (Ok(latitude), Ok(longitude)) =
                (lat.trim().parse::<f64>(), lng.trim().parse::<f64>())
            {
                if latitude.is_finite() && longitude.is_finite() {
                    return Some(AreaQuery::Near {
                        center: Coordinates::new(latitude, longitude),
                        radius_km: AREA_RADIUS_KM,
                    });
                }
            }
        }

        Some(AreaQuery::NameContains(needle))
    }

    pub fn matches(&self, record: &ListingRecord) -> bool {
        match self {
            AreaQuery::Near { center, radius_km } => record
                .location
                .as_ref()
                .and_then(|l| l.coordinates())
                .map(|at| haversine_km(at, *center) <= *radius_km + RADIUS_TOLERANCE_KM)
                .unwrap_or(false),
            AreaQuery::NameContains(needle) => record
                .display_name()
                .map(|name| name.to_lowercase().contains(needle.as_str()))
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    pub max_price: Option<f64>,
    pub min_bedrooms: Option<u32>,
    pub delivery_by: Option<NaiveDate>,
    pub area: Option<AreaQuery>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.max_price.is_none()
            && self.min_bedrooms.is_none()
            && self.delivery_by.is_none()
            && self.area.is_none()
    }

    pub fn matches(&self, record: &ListingRecord) -> bool {
        if let Some(max) = self.max_price {
            match record.price {
                Some(price) if price <= max => {}
                _ => return false,
            }
        }
        if let Some(min) = self.min_bedrooms {
            match record.bedrooms {
                Some(beds) if beds >= f64::from(min) => {}
                _ => return false,
            }
        }
        if let Some(by) = self.delivery_by {
            match record.delivery_date() {
                Some(date) if date <= by => {}
                _ => return false,
            }
        }
        match &self.area {
            Some(area) => area.matches(record),
            None => true,
        }
    }

    /// Records that satisfy every criterion, in their original order.
    pub fn apply<'a>(&self, records: &'a [ListingRecord]) -> Vec<&'a ListingRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Raw search form values, exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct FilterForm {
    pub max_price: String,
    pub min_bedrooms: String,
    pub delivery_by: String,
    pub area: String,
}

impl FilterForm {
    pub fn parse(&self) -> Result<FilterCriteria, CriteriaError> {
        let max_price = non_blank(&self.max_price)
            .map(|s| {
                s.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| CriteriaError::MaxPrice(s.to_string()))
            })
            .transpose()?;

        let min_bedrooms = non_blank(&self.min_bedrooms)
            .map(|s| {
                s.parse::<u32>()
                    .map_err(|_| CriteriaError::MinBedrooms(s.to_string()))
            })
            .transpose()?;

        let delivery_by = non_blank(&self.delivery_by)
            .map(|s| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map_err(|_| CriteriaError::DeliveryBy(s.to_string()))
            })
            .transpose()?;

        Ok(FilterCriteria {
            max_price,
            min_bedrooms,
            delivery_by,
            area: AreaQuery::parse(&self.area),
        })
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}
