//! Session-gated operations that translate the browser contract into
//! gateway calls.
//!
//! Every gated handler takes a [`CurrentUser`]. The extractor resolves
//! the session before the handler body runs, so a caller without a
//! session gets a 401 and the gateway is never contacted. Request bodies
//! are parsed leniently with [`parse_body`] so that malformed input
//! still produces a JSON error instead of an extractor rejection.

mod auth;
mod cart;
mod orders;

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::{ALLOW, CONTENT_TYPE};
use axum::http::request::Parts;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::backend::BackendReply;
use crate::error::{ApiError, BackendError};
use crate::server::{correlation_id, AppState};
use crate::session::{cookie, SessionRecord};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/add-to-cart", post(cart::add_to_cart))
        .route("/cart-data", get(cart::cart_data))
        .route("/checkout", post(orders::checkout))
        .route("/orders-data", get(orders::orders_data))
}

/// Rewrite the framework's own rejections on these routes (wrong method,
/// body over the limit) into the JSON error shape the handlers use.
pub async fn json_rejections(response: Response) -> Response {
    let message = match response.status() {
        StatusCode::PAYLOAD_TOO_LARGE => "Request body too large",
        StatusCode::METHOD_NOT_ALLOWED => "Method not allowed",
        _ => return response,
    };
    let allow = response.headers().get(ALLOW).cloned();
    let mut rewritten = (response.status(), Json(json!({ "error": message }))).into_response();
    if let Some(allow) = allow {
        rewritten.headers_mut().insert(ALLOW, allow);
    }
    rewritten
}

/// The session behind the request. Rejects with 401 when there is none.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub record: SessionRecord,
    pub correlation_id: String,
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session_id = cookie::session_id(&parts.headers, &state.config.session.cookie_name)
            .ok_or(ApiError::Unauthorized)?;
        let record = state
            .sessions
            .get(&session_id)
            .await?
            .ok_or(ApiError::Unauthorized)?;
        Ok(Self {
            record,
            correlation_id: correlation_id(&parts.headers),
        })
    }
}

/// Deserialize a JSON body. An empty body yields `T::default()`.
pub(crate) fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::Validation(format!("invalid JSON body: {e}")))
}

/// A non-empty string, or a number rendered as a string.
pub(crate) fn scalar_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn connection(message: &'static str) -> impl FnOnce(BackendError) -> ApiError {
    move |source| ApiError::Connection { message, source }
}

/// Pass a successful reply through; turn anything else into a 500.
pub(crate) fn ensure_success(
    reply: BackendReply,
    message: &'static str,
) -> Result<BackendReply, ApiError> {
    if reply.is_success() {
        Ok(reply)
    } else {
        Err(ApiError::Backend {
            message,
            status: reply.status,
            details: reply.details(),
        })
    }
}

/// Relay a gateway reply body unchanged, keeping its status and content type.
pub(crate) fn relay(reply: BackendReply) -> Response {
    let content_type = reply
        .headers
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));
    (reply.status, [(CONTENT_TYPE, content_type)], reply.body).into_response()
}
