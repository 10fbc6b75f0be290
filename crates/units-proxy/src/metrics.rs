use axum::{response::IntoResponse, routing::get, Router};
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

/// Prometheus collectors for the proxy, shared behind an `Arc`.
pub struct Metrics {
    pub registry: Registry,
    /// `GET /api/units` calls received.
    pub units_requests_total: IntCounter,
    /// Calls that ended in a 500 because the CRM side failed.
    pub upstream_failures_total: IntCounter,
    /// OAuth tokens obtained (cache misses).
    pub token_refreshes_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new_custom(Some("units_proxy".into()), None)
            .expect("Failed to create custom metrics registry");

        macro_rules! reg {
            ($metric:expr) => {{
                let collector = $metric;
                registry
                    .register(Box::new(collector.clone()))
                    .expect("Failed to register metric");
                collector
            }};
        }

        Self {
            units_requests_total: reg!(IntCounter::new(
                "units_requests_total",
                "Total number of unit list requests received"
            )
            .unwrap()),
            upstream_failures_total: reg!(IntCounter::new(
                "upstream_failures_total",
                "Unit list requests that failed upstream"
            )
            .unwrap()),
            token_refreshes_total: reg!(IntCounter::new(
                "token_refreshes_total",
                "OAuth access tokens requested from the CRM"
            )
            .unwrap()),
            registry,
        }
    }

    /// Serves the registry on `/metrics`.
    pub fn router(&self) -> Router {
        let registry = self.registry.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let registry = registry.clone();
                async move {
                    let metric_families = registry.gather();
                    let mut buffer = Vec::new();
                    let encoder = TextEncoder::new();
                    encoder
                        .encode(&metric_families, &mut buffer)
                        .expect("Failed to encode metrics");
                    String::from_utf8(buffer)
                        .expect("Metrics buffer is not valid UTF-8")
                        .into_response()
                }
            }),
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
