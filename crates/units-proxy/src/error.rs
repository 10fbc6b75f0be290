use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Everything that can go wrong between the browser and the CRM. All of it
/// reaches the client as the same opaque 500.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("failed to authenticate with Salesforce: {0}")]
    Auth(String),
    #[error("unit query failed: {0}")]
    Upstream(String),
    #[error("could not decode CRM response: {0}")]
    Decode(String),
}

pub const FETCH_FAILED: &str = "Failed to fetch units";

fn api_error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message.into() })))
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Salesforce API error");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, FETCH_FAILED).into_response()
    }
}
