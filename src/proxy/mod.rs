//! Transparent streaming passthrough to the gateway.
//!
//! [`forward_handler`] is the Axum fallback: any request whose path sits
//! under the configured prefix is sent to the gateway with the same
//! method, headers and body, and the gateway's status, headers and body
//! are relayed back. Neither body is buffered; hyper pulls request
//! frames only as fast as the gateway accepts them, and the response
//! body is polled only as fast as the client reads it. If the client
//! goes away, the handler future and with it the upstream exchange are
//! dropped.

pub mod routing;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::server::{correlation_id, AppState};

pub async fn forward_handler(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let correlation_id = correlation_id(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let Some(target) = routing::target_path(&state.config.proxy.prefix, request.uri()) else {
        tracing::debug!(
            correlation_id = %correlation_id,
            method = %method,
            path = %path,
            "no route matched"
        );
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response();
    };

    tracing::info!(
        correlation_id = %correlation_id,
        method = %method,
        path = %path,
        target = %target,
        "forwarding request"
    );

    let start = Instant::now();
    let (parts, body) = request.into_parts();

    match state
        .backend
        .call(parts.method, &target, parts.headers, body)
        .await
    {
        Ok(response) => {
            state.stats.forwarded.fetch_add(1, Ordering::Relaxed);
            #[allow(clippy::cast_possible_truncation)]
            let latency_ms = start.elapsed().as_millis() as u64;
            tracing::info!(
                correlation_id = %correlation_id,
                status = response.status().as_u16(),
                latency_ms,
                "gateway responded"
            );
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            state.stats.failed.fetch_add(1, Ordering::Relaxed);
            tracing::error!(
                correlation_id = %correlation_id,
                method = %method,
                path = %path,
                error = %e,
                "gateway request failed"
            );
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "Bad gateway" })),
            )
                .into_response()
        }
    }
}
