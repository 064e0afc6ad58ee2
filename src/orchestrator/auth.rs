//! `POST /login` and `POST /logout`.
//!
//! Credentials are checked by the gateway alone. A session is created
//! only when the gateway answers 2xx with an identifier (`user_id`, or
//! `id`); the browser always gets a freshly minted session id on login.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, Method};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{connection, parse_body, scalar_id};
use crate::error::ApiError;
use crate::server::{correlation_id, AppState};
use crate::session::{cookie, SessionId, SessionRecord};

#[derive(Debug, Default, Deserialize)]
struct LoginBody {
    username: Option<String>,
    password: Option<String>,
}

fn user_identifier(reply: &Value) -> Option<String> {
    reply
        .get("user_id")
        .and_then(scalar_id)
        .or_else(|| reply.get("id").and_then(scalar_id))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let correlation_id = correlation_id(&headers);
    let LoginBody { username, password } = parse_body(&body)?;
    let (Some(username), Some(password)) = (
        username.filter(|u| !u.is_empty()),
        password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::Validation(
            "username and password are required".into(),
        ));
    };

    let payload = json!({ "username": username, "password": password });
    let reply = state
        .backend
        .call_json(Method::POST, &state.config.endpoints.login, Some(&payload))
        .await
        .map_err(connection("Login failed"))?;

    if !reply.is_success() {
        tracing::info!(
            correlation_id = %correlation_id,
            username = %username,
            status = reply.status.as_u16(),
            "gateway rejected login"
        );
        return Err(ApiError::Unauthorized);
    }
    let Some(user_id) = reply.json().as_ref().and_then(user_identifier) else {
        tracing::warn!(
            correlation_id = %correlation_id,
            username = %username,
            "gateway accepted login without a user identifier"
        );
        return Err(ApiError::Unauthorized);
    };

    let session = &state.config.session;
    if let Some(previous) = cookie::session_id(&headers, &session.cookie_name) {
        state.sessions.remove(&previous).await?;
    }

    let session_id = SessionId::generate();
    let record = SessionRecord { username, user_id };
    state.sessions.put(&session_id, record.clone()).await?;

    tracing::info!(
        correlation_id = %correlation_id,
        username = %record.username,
        user_id = %record.user_id,
        "login succeeded"
    );

    let set_cookie = cookie::issue(
        &session.cookie_name,
        &session_id,
        session.ttl,
        session.secure_cookie,
    );
    Ok(([(SET_COOKIE, set_cookie)], Json(record)).into_response())
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = &state.config.session;
    if let Some(session_id) = cookie::session_id(&headers, &session.cookie_name) {
        state.sessions.remove(&session_id).await?;
        tracing::info!(correlation_id = %correlation_id(&headers), "logged out");
    }

    let set_cookie = cookie::expire(&session.cookie_name, session.secure_cookie);
    Ok(([(SET_COOKIE, set_cookie)], Json(json!({ "ok": true }))).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_user_id_over_id() {
        let reply = json!({ "user_id": "u1", "id": "other" });
        assert_eq!(user_identifier(&reply), Some("u1".into()));
    }

    #[test]
    fn falls_back_to_id() {
        assert_eq!(user_identifier(&json!({ "id": 7 })), Some("7".into()));
        assert_eq!(
            user_identifier(&json!({ "user_id": "", "id": "u2" })),
            Some("u2".into())
        );
    }

    #[test]
    fn missing_identifier() {
        assert_eq!(user_identifier(&json!({ "token": "t" })), None);
        assert_eq!(user_identifier(&json!([1, 2])), None);
    }
}
