//! HTTP transport for the evaluation pipeline.
//!
//! Thin glue: parse the multipart upload, hand it to the [`Evaluator`] on the
//! blocking pool, serialize the result or the error.

pub mod error;
pub mod routes;

use crate::config::Config;
use crate::error::{LectometroError, Result};
use crate::evaluation::Evaluator;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub evaluator: Arc<Evaluator>,
}

impl AppState {
    pub fn new(evaluator: Arc<Evaluator>) -> Self {
        Self { evaluator }
    }
}

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/evaluate", post(routes::evaluate))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind to the configured address and serve until SIGINT/SIGTERM.
pub async fn serve(config: &Config, evaluator: Arc<Evaluator>) -> Result<()> {
    let app = build_router(AppState::new(evaluator), config.server.max_upload_bytes());

    let listener = TcpListener::bind(&config.server.bind)
        .await
        .map_err(|e| {
            LectometroError::Other(format!("Failed to bind {}: {}", config.server.bind, e))
        })?;
    let local_addr = listener.local_addr()?;
    tracing::info!(addr = %local_addr, "Listening for evaluation requests");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                tracing::warn!(error = %e, "Failed to listen for SIGINT");
            }
            tracing::info!("Received SIGINT, shutting down");
        }
        res = wait_for_sigterm() => {
            if let Err(e) = res {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
            }
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}

/// Wait for SIGTERM signal (sent by service managers).
#[cfg(unix)]
async fn wait_for_sigterm() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};
    let mut sigterm = signal(SignalKind::terminate())?;
    sigterm.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_sigterm() -> std::io::Result<()> {
    // On non-Unix, just wait forever (Ctrl+C will still work)
    std::future::pending::<std::io::Result<()>>().await
}
