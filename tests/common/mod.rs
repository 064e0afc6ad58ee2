//! Shared harness: a scripted gateway and an edge server pointed at it.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use serde_json::{json, Value};

use storefront_edge::backend::{build_http_client, BackendClient};
use storefront_edge::config::model::Config;
use storefront_edge::server::{self, AppState};
use storefront_edge::session::memory::MemoryStore;

/// Raw cart body, deliberately not in serde_json's canonical formatting.
pub fn cart_body(user_id: &str) -> String {
    format!("{{ \"user_id\" : \"{user_id}\",\n  \"items\": [ {{\"product_id\":\"p1\",\"qty\":2}} ] }}")
}

/// Every request the gateway received, as `"METHOD /path"`.
#[derive(Clone, Default)]
pub struct Hits(Arc<Mutex<Vec<String>>>);

impl Hits {
    fn record(&self, method: &Method, uri: &Uri) {
        self.0.lock().unwrap().push(format!("{method} {}", uri.path()));
    }

    pub fn all(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

async fn login(State(hits): State<Hits>, uri: Uri, Json(body): Json<Value>) -> Response {
    hits.record(&Method::POST, &uri);
    let username = body["username"].as_str().unwrap_or_default().to_string();
    match (username.as_str(), body["password"].as_str()) {
        (_, Some("wrong")) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid credentials" })),
        )
            .into_response(),
        ("anonymous", _) => Json(json!({ "token": "t" })).into_response(),
        ("legacy", _) => Json(json!({ "id": 7 })).into_response(),
        _ => Json(json!({ "user_id": format!("u-{username}") })).into_response(),
    }
}

async fn cart_add(State(hits): State<Hits>, uri: Uri, Json(body): Json<Value>) -> Response {
    hits.record(&Method::POST, &uri);
    if body["user_id"] == "u-broke" {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "detail": "cart offline" })),
        )
            .into_response();
    }
    // Let concurrent requests interleave.
    tokio::time::sleep(Duration::from_millis(20)).await;
    Json(json!({ "user_id": body["user_id"], "items": [{ "product_id": body["product_id"] }] }))
        .into_response()
}

async fn cart(State(hits): State<Hits>, uri: Uri, Path(user_id): Path<String>) -> Response {
    hits.record(&Method::GET, &uri);
    if user_id == "u-ghost" {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "Cart not found" })))
            .into_response();
    }
    (
        [(CONTENT_TYPE, "application/json; charset=utf-8")],
        cart_body(&user_id),
    )
        .into_response()
}

async fn checkout(State(hits): State<Hits>, uri: Uri, Json(body): Json<Value>) -> Response {
    hits.record(&Method::POST, &uri);
    if body["user_id"] == "u-broke" {
        return (StatusCode::SERVICE_UNAVAILABLE, "orders offline").into_response();
    }
    Json(json!({ "order_id": "o-1", "user_id": body["user_id"], "status": "created" }))
        .into_response()
}

async fn orders(State(hits): State<Hits>, uri: Uri, Path(user_id): Path<String>) -> Response {
    hits.record(&Method::GET, &uri);
    if user_id == "u-ghost" {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "User not found" })))
            .into_response();
    }
    Json(json!([{ "order_id": "o-1", "user_id": user_id }])).into_response()
}

async fn echo(
    State(hits): State<Hits>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    hits.record(&method, &uri);
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(String::from);
    let all = |name: &str| {
        headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(String::from)
            .collect::<Vec<_>>()
    };
    (
        StatusCode::ACCEPTED,
        [("x-gateway", "echo")],
        Json(json!({
            "method": method.as_str(),
            "path": uri.path(),
            "query": uri.query(),
            "body": String::from_utf8_lossy(&body),
            "x_test": header("x-test"),
            "content_type": header("content-type"),
            "authorization": header("authorization"),
            "cookie": header("cookie"),
            "x_multi": all("x-multi"),
        })),
    )
        .into_response()
}

/// Stream the request body straight back.
async fn mirror(State(hits): State<Hits>, uri: Uri, body: Body) -> Response {
    hits.record(&Method::POST, &uri);
    Response::new(body)
}

/// `size` bytes of [`pattern`], sent in 8 KiB chunks.
async fn download(State(hits): State<Hits>, uri: Uri, Path(size): Path<usize>) -> Response {
    hits.record(&Method::GET, &uri);
    let chunks: Vec<Result<Bytes, std::io::Error>> = pattern(size)
        .chunks(8 * 1024)
        .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
        .collect();
    Response::new(Body::from_stream(futures_util::stream::iter(chunks)))
}

/// Deterministic test payload.
pub fn pattern(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 251) as u8).collect()
}

async fn slow(State(hits): State<Hits>, uri: Uri) -> &'static str {
    hits.record(&Method::GET, &uri);
    tokio::time::sleep(Duration::from_secs(5)).await;
    "late"
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Start the scripted gateway. Its API lives under `/api`.
pub async fn start_gateway() -> (SocketAddr, Hits) {
    let hits = Hits::default();
    let router = Router::new()
        .route("/api/login", post(login))
        .route("/api/cart/add", post(cart_add))
        .route("/api/cart/{user_id}", get(cart))
        .route("/api/order", post(checkout))
        .route("/api/order/{user_id}", get(orders))
        .route("/api/slow", get(slow))
        .route("/api/mirror", post(mirror))
        .route("/api/download/{size}", get(download))
        .fallback(echo)
        .with_state(hits.clone());
    (serve(router).await, hits)
}

/// An address nothing listens on.
pub fn dead_address() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub struct Edge {
    pub addr: SocketAddr,
    pub state: Arc<AppState>,
    pub client: reqwest::Client,
}

impl Edge {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Log in and return the `sid=...` pair to send back as a cookie.
    pub async fn login(&self, username: &str) -> String {
        let resp = self
            .client
            .post(self.url("/login"))
            .json(&json!({ "username": username, "password": "pw" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200, "login for {username} failed");
        session_cookie(&resp).expect("login sets a session cookie")
    }
}

/// The `name=value` part of the response's `Set-Cookie`, if any.
pub fn session_cookie(resp: &reqwest::Response) -> Option<String> {
    resp.headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(String::from)
}

pub async fn start_edge(gateway: SocketAddr, configure: impl FnOnce(&mut Config)) -> Edge {
    let mut config = Config::default();
    config.gateway.url = format!("http://{gateway}/api");
    configure(&mut config);

    let backend = BackendClient::new(
        build_http_client(),
        &config.gateway.url,
        config.gateway.timeout,
    );
    let sessions = Arc::new(MemoryStore::new(Duration::from_secs(config.session.ttl)));
    let state = Arc::new(AppState::new(config, backend, sessions));

    let addr = serve(server::build_router(Arc::clone(&state), 64 * 1024)).await;
    Edge {
        addr,
        state,
        client: reqwest::Client::new(),
    }
}
