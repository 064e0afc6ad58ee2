//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared state holding config, gateway
//! client, session store, stats, and uptime), [`build_router`] for
//! wiring the orchestration routes, `/health` and the passthrough
//! fallback, and [`shutdown_signal`] for SIGTERM / Ctrl+C handling.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Instant;

use axum::http::HeaderMap;
use axum::routing::get;
use axum::{middleware, Router};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::backend::BackendClient;
use crate::config::model::Config;
use crate::health::health_handler;
use crate::session::SessionStore;
use crate::{orchestrator, proxy};

#[derive(Debug)]
pub struct Stats {
    pub forwarded: AtomicU64,
    pub failed: AtomicU64,
    pub checkout_fallbacks: AtomicU64,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            forwarded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            checkout_fallbacks: AtomicU64::new(0),
        }
    }
}

pub struct AppState {
    pub config: Arc<Config>,
    pub backend: BackendClient,
    pub sessions: Arc<dyn SessionStore>,
    pub start_time: Instant,
    pub stats: Stats,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, backend: BackendClient, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            config: Arc::new(config),
            backend,
            sessions,
            start_time: Instant::now(),
            stats: Stats::new(),
        }
    }
}

/// The caller's `x-correlation-id`, or a fresh UUID.
#[must_use]
pub fn correlation_id(headers: &HeaderMap) -> String {
    headers
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from)
}

/// Orchestration bodies are small JSON documents and get `max_body`;
/// proxied bodies are streamed and not limited here. Rejections on the
/// edge's own routes are JSON; proxied responses are never rewritten.
pub fn build_router(state: Arc<AppState>, max_body: usize) -> Router {
    let local = Router::new()
        .route("/health", get(health_handler))
        .merge(orchestrator::routes())
        .layer(RequestBodyLimitLayer::new(max_body))
        .layer(middleware::map_response(orchestrator::json_rejections));

    Router::new()
        .merge(local)
        .fallback(proxy::forward_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
