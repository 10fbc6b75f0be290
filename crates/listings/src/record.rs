//! The listing record as delivered by the CRM query.
//!
//! Field names follow the upstream object (`Unit__c`). Every field except the
//! identifier is optional, and numeric fields are parsed leniently: a value
//! that is missing, `null`, or not a number becomes `None` instead of failing
//! the whole record.

use crate::geo::Coordinates;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Where a unit is. The CRM stores either a geolocation compound field or a
/// plain address string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Location {
    Coordinates(Coordinates),
    Text(String),
}

impl Location {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Location::Coordinates(c) => Some(*c),
            Location::Text(_) => None,
        }
    }

    /// Human readable form used on cards.
    pub fn label(&self) -> String {
        match self {
            Location::Coordinates(c) => format!("{:.5}, {:.5}", c.latitude, c.longitude),
            Location::Text(t) => t.clone(),
        }
    }
}

/// One real-estate unit. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListingRecord {
    #[serde(rename = "Id", default)]
    pub id: String,

    /// Short record name (often an auto-number).
    #[serde(rename = "Name", default)]
    pub name: Option<String>,

    /// Marketing name shown on cards.
    #[serde(rename = "Complete_Name__c", default)]
    pub complete_name: Option<String>,

    #[serde(rename = "Location__c", default, deserialize_with = "lenient_location")]
    pub location: Option<Location>,

    #[serde(rename = "Bedrooms__c", default, deserialize_with = "lenient_number")]
    pub bedrooms: Option<f64>,

    #[serde(rename = "Bathrooms__c", default, deserialize_with = "lenient_number")]
    pub bathrooms: Option<f64>,

    /// Garden area in square metres.
    #[serde(rename = "Garden_Area__c", default, deserialize_with = "lenient_number")]
    pub garden_area: Option<f64>,

    #[serde(rename = "Price__c", default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,

    /// Raw delivery date as sent upstream; see [`ListingRecord::delivery_date`].
    #[serde(rename = "Delivery_Date__c", default)]
    pub delivery_date_raw: Option<String>,

    #[serde(rename = "Status__c", default)]
    pub status: Option<String>,
}

impl ListingRecord {
    /// Card title: the marketing name, falling back to the record name.
    pub fn display_name(&self) -> Option<&str> {
        self.complete_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.name.as_deref().filter(|s| !s.trim().is_empty()))
    }

    /// Delivery date, accepting both `YYYY-MM-DD` and full timestamps.
    pub fn delivery_date(&self) -> Option<NaiveDate> {
        let raw = self.delivery_date_raw.as_deref()?.trim();
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_location<'de, D>(deserializer: D) -> Result<Option<Location>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => {
            let lat = map.get("latitude").and_then(Value::as_f64);
            let lng = map.get("longitude").and_then(Value::as_f64);
            match (lat, lng) {
                (Some(latitude), Some(longitude)) => Some(Location::Coordinates(Coordinates {
                    latitude,
                    longitude,
                })),
                _ => None,
            }
        }
        Value::String(s) if !s.trim().is_empty() => Some(Location::Text(s)),
        _ => None,
    })
}

/// Decodes the JSON array returned by `/api/units`.
pub fn parse_records(body: &[u8]) -> Result<Vec<ListingRecord>, serde_json::Error> {
    serde_json::from_slice(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_upstream_record_with_geolocation() {
        let body = br#"[{
            "attributes": {"type": "Unit__c"},
            "Id": "a01",
            "Name": "U-0001",
            "Complete_Name__c": "Palm Residence 4B",
            "Bedrooms__c": 3,
            "Bathrooms__c": 2,
            "Garden_Area__c": null,
            "Price__c": 1250000,
            "Status__c": "Available",
            "Location__c": {"latitude": 30.0444, "longitude": 31.2357},
            "Delivery_Date__c": "2026-03-31"
        }]"#;

        let records = parse_records(body).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.display_name(), Some("Palm Residence 4B"));
        assert_eq!(r.bedrooms, Some(3.0));
        assert_eq!(r.garden_area, None);
        assert_eq!(r.status.as_deref(), Some("Available"));
        assert_eq!(
            r.location.as_ref().and_then(Location::coordinates),
            Some(Coordinates { latitude: 30.0444, longitude: 31.2357 })
        );
        assert_eq!(r.delivery_date(), NaiveDate::from_ymd_opt(2026, 3, 31));
    }

    #[test]
    fn malformed_fields_do_not_drop_the_record() {
        let body = br#"[{
            "Id": "a02",
            "Name": "U-0002",
            "Price__c": "not a price",
            "Bedrooms__c": "4",
            "Location__c": {"latitude": null},
            "Delivery_Date__c": "soon"
        }]"#;

        let records = parse_records(body).unwrap();
        let r = &records[0];
        assert_eq!(r.price, None);
        assert_eq!(r.bedrooms, Some(4.0));
        assert_eq!(r.location, None);
        assert_eq!(r.delivery_date(), None);
        assert_eq!(r.display_name(), Some("U-0002"));
    }

    #[test]
    fn text_location_and_timestamp_delivery() {
        let body = br#"[{"Id": "a03", "Location__c": "New Cairo", "Delivery_Date__c": "2027-01-15T00:00:00.000+0000"}]"#;
        let r = &parse_records(body).unwrap()[0];
        assert_eq!(r.location, Some(Location::Text("New Cairo".into())));
        assert_eq!(r.delivery_date(), NaiveDate::from_ymd_opt(2027, 1, 15));
        assert_eq!(r.display_name(), None);
    }
}
