// units-proxy/src/main.rs
mod config;
mod error;
mod metrics;
mod routes;
mod salesforce;
mod token;

use crate::config::Config;
use crate::metrics::Metrics;
use crate::routes::AppState;
use crate::salesforce::SalesforceClient;
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::parse();
    tracing::info!(config = ?config, "Loaded configuration");

    let metrics = Arc::new(Metrics::new());
    let state = AppState {
        salesforce: Arc::new(SalesforceClient::new(&config, metrics.clone())),
        metrics: metrics.clone(),
    };

    // Optional metrics server
    let metrics_handle = config.metrics_listen_addr.map(|addr| {
        let router = metrics.router();
        tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("Failed to bind metrics listener on {addr}"))?;
            axum::serve(listener, router.into_make_service()).await?;
            Ok::<(), anyhow::Error>(())
        })
    });

    let addr = config.listen_addr();
    let app = routes::router(state, &config.static_dir);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(%addr, static_dir = %config.static_dir.display(), "Server running");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Shutdown signal received. Stopping metrics server...");
    if let Some(handle) = metrics_handle {
        handle.abort();
        match handle.await {
            Ok(Err(e)) => tracing::error!(error = %e, "Metrics server task failed."),
            Err(e) if !e.is_cancelled() => tracing::error!(error = %e, "Metrics server task panicked."),
            _ => {}
        }
    }

    tracing::info!("Proxy shut down gracefully.");
    Ok(())
}

/// Listens for OS shutdown signals (SIGINT, SIGTERM) and resolves when one is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
