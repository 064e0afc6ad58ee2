//! `POST /add-to-cart` and `GET /cart-data`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::Method;
use axum::response::Response;
use axum::Json;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{connection, ensure_success, parse_body, relay, scalar_id, CurrentUser};
use crate::backend::join_segment;
use crate::error::ApiError;
use crate::server::AppState;

#[derive(Debug, Default, Deserialize)]
struct AddToCartBody {
    product_id: Option<Value>,
}

pub async fn add_to_cart(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let request: AddToCartBody = parse_body(&body)?;
    let product_id = request
        .product_id
        .as_ref()
        .and_then(scalar_id)
        .ok_or_else(|| ApiError::Validation("product_id is required".into()))?;

    let payload = json!({ "user_id": user.record.user_id, "product_id": product_id });
    let reply = state
        .backend
        .call_json(Method::POST, &state.config.endpoints.cart_add, Some(&payload))
        .await
        .map_err(connection("Failed to add to cart"))?;
    let reply = ensure_success(reply, "Failed to add to cart")?;

    tracing::info!(
        correlation_id = %user.correlation_id,
        user_id = %user.record.user_id,
        product_id = %product_id,
        "added to cart"
    );
    Ok(Json(json!({ "ok": true, "cart": reply.json() })))
}

pub async fn cart_data(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Response, ApiError> {
    let path = join_segment(&state.config.endpoints.cart, &user.record.user_id);
    let reply = state
        .backend
        .call_json(Method::GET, &path, None)
        .await
        .map_err(connection("Failed to load cart"))?;
    tracing::debug!(
        correlation_id = %user.correlation_id,
        user_id = %user.record.user_id,
        status = reply.status.as_u16(),
        "cart fetched"
    );
    Ok(relay(ensure_success(reply, "Failed to load cart")?))
}
