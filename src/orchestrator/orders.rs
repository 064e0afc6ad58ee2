//! `POST /checkout` and `GET /orders-data`.
//!
//! Checkout never fails once the caller is authenticated: if the gateway
//! is unreachable or answers with an error, the browser still gets
//! `{ok: true}` with a synthetic order flagged `fallback: true` and the
//! reason attached, so the purchase flow can finish.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::http::Method;
use axum::response::Response;
use axum::Json;
use serde_json::{json, Value};

use super::{connection, ensure_success, relay, CurrentUser};
use crate::backend::join_segment;
use crate::error::ApiError;
use crate::server::AppState;

fn fallback_order(user_id: &str, reason: &str) -> Value {
    json!({
        "order_id": format!("fallback-{}", uuid::Uuid::new_v4()),
        "user_id": user_id,
        "items": [],
        "status": "fallback",
        "fallback": true,
        "reason": reason,
    })
}

pub async fn checkout(State(state): State<Arc<AppState>>, user: CurrentUser) -> Json<Value> {
    let user_id = &user.record.user_id;
    let payload = json!({ "user_id": user_id });
    let result = state
        .backend
        .call_json(Method::POST, &state.config.endpoints.checkout, Some(&payload))
        .await;

    let reason = match result {
        Ok(reply) if reply.is_success() => {
            tracing::info!(
                correlation_id = %user.correlation_id,
                user_id = %user_id,
                "checkout completed"
            );
            return Json(json!({ "ok": true, "order": reply.details() }));
        }
        Ok(reply) => format!(
            "gateway returned {}: {}",
            reply.status.as_u16(),
            reply.details()
        ),
        Err(e) => e.to_string(),
    };

    state.stats.checkout_fallbacks.fetch_add(1, Ordering::Relaxed);
    tracing::warn!(
        correlation_id = %user.correlation_id,
        user_id = %user_id,
        reason = %reason,
        "checkout degraded to fallback order"
    );
    Json(json!({ "ok": true, "order": fallback_order(user_id, &reason) }))
}

pub async fn orders_data(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Response, ApiError> {
    let path = join_segment(&state.config.endpoints.orders, &user.record.user_id);
    let reply = state
        .backend
        .call_json(Method::GET, &path, None)
        .await
        .map_err(connection("Failed to load orders"))?;
    tracing::debug!(
        correlation_id = %user.correlation_id,
        user_id = %user.record.user_id,
        status = reply.status.as_u16(),
        "orders fetched"
    );
    Ok(relay(ensure_success(reply, "Failed to load orders")?))
}
