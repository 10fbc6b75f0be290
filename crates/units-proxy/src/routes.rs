use crate::error::ProxyError;
use crate::metrics::Metrics;
use crate::salesforce::SalesforceClient;
use axum::{extract::State, routing::get, Json, Router};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub salesforce: Arc<SalesforceClient>,
    pub metrics: Arc<Metrics>,
}

/// API routes plus the static landing page for everything else.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods(Any);

    Router::new()
        .route("/api/units", get(get_units))
        .route("/healthz", get(healthz))
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn get_units(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ProxyError> {
    state.metrics.units_requests_total.inc();
    match state.salesforce.fetch_units().await {
        Ok(records) => {
            tracing::info!(count = records.len(), "Served units");
            Ok(Json(records))
        }
        Err(e) => {
            state.metrics.upstream_failures_total.inc();
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use clap::Parser;
    use std::net::SocketAddr;

    /// Serves the router on an ephemeral port with an unreachable CRM.
    async fn spawn_app(static_dir: &Path) -> (SocketAddr, Arc<Metrics>) {
        let config = Config::parse_from([
            "units_proxy",
            "--sf-instance-url",
            "http://127.0.0.1:9",
            "--sf-client-id",
            "id",
            "--sf-client-secret",
            "secret",
            "--sf-username",
            "user",
            "--sf-password",
            "pass",
        ]);
        let metrics = Arc::new(Metrics::new());
        let state = AppState {
            salesforce: Arc::new(SalesforceClient::new(&config, metrics.clone())),
            metrics: metrics.clone(),
        };
        let app = router(state, static_dir);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service()).await.unwrap();
        });
        (addr, metrics)
    }

    #[tokio::test]
    async fn healthz_is_ok() {
        let (addr, _) = spawn_app(Path::new("public")).await;
        let body = reqwest::get(format!("http://{addr}/healthz"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn upstream_failure_is_an_opaque_500() {
        let (addr, metrics) = spawn_app(Path::new("public")).await;
        let resp = reqwest::get(format!("http://{addr}/api/units")).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Failed to fetch units" }));
        assert_eq!(metrics.units_requests_total.get(), 1);
        assert_eq!(metrics.upstream_failures_total.get(), 1);
    }

    #[tokio::test]
    async fn unknown_paths_fall_back_to_static_files() {
        let dir = std::env::temp_dir().join(format!("units-proxy-static-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "<h1>Skyline</h1>").unwrap();

        let (addr, _) = spawn_app(&dir).await;
        let page = reqwest::get(format!("http://{addr}/")).await.unwrap();
        assert!(page.status().is_success());
        assert_eq!(page.text().await.unwrap(), "<h1>Skyline</h1>");

        let missing = reqwest::get(format!("http://{addr}/nope.js")).await.unwrap();
        assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

        std::fs::remove_dir_all(&dir).ok();
    }
}
