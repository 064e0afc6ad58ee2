//! `GET /health` endpoint handler.
//!
//! Returns a [`HealthResponse`] JSON payload containing the server
//! version, uptime, where requests are sent, which session store is in
//! use, and cumulative request statistics.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::AppState;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub gateway: GatewayHealth,
    pub session_store: String,
    pub stats: StatsResponse,
}

#[derive(Serialize, Deserialize)]
pub struct GatewayHealth {
    pub url: String,
    pub proxy_prefix: String,
    pub timeout_ms: Option<u64>,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub requests_forwarded: u64,
    pub requests_failed: u64,
    pub checkout_fallbacks: u64,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        gateway: GatewayHealth {
            url: state.backend.base_url().to_string(),
            proxy_prefix: state.config.proxy.prefix.clone(),
            timeout_ms: state.config.gateway.timeout,
        },
        session_store: state.sessions.name().to_string(),
        stats: StatsResponse {
            requests_forwarded: state.stats.forwarded.load(Ordering::Relaxed),
            requests_failed: state.stats.failed.load(Ordering::Relaxed),
            checkout_fallbacks: state.stats.checkout_fallbacks.load(Ordering::Relaxed),
        },
    })
}
