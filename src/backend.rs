//! Client for the single upstream API gateway.
//!
//! [`BackendClient::call`] is the streaming primitive used by the
//! passthrough proxy: the request body is handed to hyper as-is and the
//! response comes back with its body still unread. [`BackendClient::call_json`]
//! builds on it for the orchestration operations, which send a JSON
//! payload and need the whole reply in memory to inspect it.
//!
//! No retries are attempted. The optional timeout only bounds the wait
//! for response headers and surfaces as [`BackendError::Timeout`].

use std::time::Duration;

use axum::body::Body;
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, Method, Request, Response, StatusCode, Uri};
use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde_json::Value;

use crate::error::BackendError;

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
pub type HttpClient = Client<HttpsConnector, Body>;

#[must_use]
pub fn build_http_client() -> HttpClient {
    // When multiple rustls crypto providers are compiled in, rustls cannot
    // auto-detect which one to use. Explicitly install `ring`.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(https)
}

/// A fully read gateway reply.
#[derive(Debug, Clone)]
pub struct BackendReply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl BackendReply {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The body parsed as JSON, if it is JSON.
    #[must_use]
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// The body as JSON, falling back to its text (or `null` when empty).
    /// Used to attach gateway output to error replies.
    #[must_use]
    pub fn details(&self) -> Value {
        if self.body.is_empty() {
            return Value::Null;
        }
        self.json()
            .unwrap_or_else(|| Value::String(String::from_utf8_lossy(&self.body).into_owned()))
    }
}

#[derive(Clone)]
pub struct BackendClient {
    client: HttpClient,
    base: String,
    timeout_ms: Option<u64>,
}

impl BackendClient {
    #[must_use]
    pub fn new(client: HttpClient, base_url: &str, timeout_ms: Option<u64>) -> Self {
        Self {
            client,
            base: base_url.trim_end_matches('/').to_string(),
            timeout_ms,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Absolute URL for a gateway-relative path. `path` (including any
    /// query string) is appended verbatim.
    #[must_use]
    pub fn target(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    pub async fn call(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body: Body,
    ) -> Result<Response<Incoming>, BackendError> {
        let target = self.target(path);
        let uri: Uri = target.parse().map_err(|e| BackendError::InvalidUri {
            uri: target.clone(),
            source: Box::new(e),
        })?;

        let mut request = Request::builder().method(method).uri(uri).body(body)?;
        *request.headers_mut() = headers;

        let pending = self.client.request(request);
        let response = match self.timeout_ms {
            Some(ms) => tokio::time::timeout(Duration::from_millis(ms), pending)
                .await
                .map_err(|_| BackendError::Timeout(ms))??,
            None => pending.await?,
        };
        Ok(response)
    }

    /// Send `payload` as a JSON body (or no body) and read the whole reply.
    pub async fn call_json(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<BackendReply, BackendError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let body = match payload {
            Some(value) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self.call(method, path, headers, body).await?;
        let (parts, body) = response.into_parts();
        let body = body.collect().await?.to_bytes();

        Ok(BackendReply {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }
}

/// `{path}/{segment}`, with `segment` percent-encoded so it stays a single
/// path segment whatever it contains.
#[must_use]
pub fn join_segment(path: &str, segment: &str) -> String {
    // form encoding escapes '+' itself, so any '+' left is an encoded space
    let encoded: String = url::form_urlencoded::byte_serialize(segment.as_bytes()).collect();
    format!("{}/{}", path.trim_end_matches('/'), encoded.replace('+', "%20"))
}
