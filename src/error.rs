//! Error types for storefront-edge.
//!
//! [`EdgeError`] covers startup and CLI failures, [`ValidationError`]
//! describes a single config problem, [`BackendError`] is anything that
//! prevented a gateway response from arriving, and [`SessionError`] is a
//! session store failure. [`ApiError`] is the browser-facing taxonomy:
//! every variant maps to a status code and a JSON body with an `error`
//! field.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}: {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EdgeError {
    #[error("Config file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config parse error in {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Unsupported config format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("File already exists: {}", path.display())]
    FileExists { path: PathBuf },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(hyper::StatusCode),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// The gateway could not be reached, or stopped answering before a full
/// response was read.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("invalid gateway URI '{uri}': {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to build gateway request: {0}")]
    Request(#[from] http::Error),

    #[error("gateway connection failed: {0}")]
    Connect(#[from] hyper_util::client::legacy::Error),

    #[error("gateway did not respond within {0} ms")]
    Timeout(u64),

    #[error("gateway response body interrupted: {0}")]
    Body(#[from] hyper::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session store '{store}' unavailable: {source}")]
    Unavailable {
        store: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("corrupt session record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Failure of a browser-facing operation.
///
/// `Validation` and `Unauthorized` are always raised before any gateway
/// call. `Backend` carries the gateway's status and whatever body it sent.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("{message} (gateway returned {status})")]
    Backend {
        message: &'static str,
        status: StatusCode,
        details: Value,
    },

    #[error("{message}: {source}")]
    Connection {
        message: &'static str,
        #[source]
        source: BackendError,
    },

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Backend { .. } | Self::Connection { .. } | Self::Session(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> Value {
        match self {
            Self::Validation(message) => json!({ "error": message }),
            Self::Unauthorized => json!({ "error": "Unauthorized" }),
            Self::Backend {
                message,
                status,
                details,
            } => json!({
                "error": message,
                "status": status.as_u16(),
                "details": details,
            }),
            Self::Connection { message, source } => json!({
                "error": message,
                "details": source.to_string(),
            }),
            Self::Session(_) => json!({ "error": "Session store unavailable" }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Validation(_) | Self::Unauthorized => {
                tracing::debug!(error = %self, "request rejected");
            }
            _ => tracing::warn!(error = %self, "operation failed"),
        }
        (self.status(), Json(self.body())).into_response()
    }
}
