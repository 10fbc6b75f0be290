use thiserror::Error;

/// Why loading the listing set failed. Every variant is terminal for that
/// load attempt; nothing retries automatically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("units endpoint returned HTTP {0}")]
    Status(u16),
    #[error("could not decode units payload: {0}")]
    Decode(String),
}

/// A search form field that could not be turned into a criterion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CriteriaError {
    #[error("maximum price '{0}' is not a number")]
    MaxPrice(String),
    #[error("minimum bedrooms '{0}' is not a whole number")]
    MinBedrooms(String),
    #[error("delivery date '{0}' is not a YYYY-MM-DD date")]
    DeliveryBy(String),
}
