//! Per-browser session records.
//!
//! The [`SessionStore`] trait is the only place session state lives: a
//! key-value capability mapping a [`SessionId`] to a [`SessionRecord`].
//! [`memory::MemoryStore`] is the default; [`redis_store::RedisStore`]
//! (feature `redis`) shares sessions across instances. The id itself
//! travels in a cookie, see [`cookie`].

pub mod cookie;
pub mod memory;
#[cfg(feature = "redis")]
pub mod redis_store;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::model::{SessionConfig, StoreKind};
use crate::error::{EdgeError, SessionError};

const MAX_ID_LEN: usize = 128;

/// The authenticated user behind a session. Replaced wholesale on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub username: String,
    pub user_id: String,
}

/// Opaque session identifier: 1-128 characters of `[A-Za-z0-9_-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_ID_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        valid.then(|| Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// async_trait is required here because SessionStore is used as Arc<dyn SessionStore>
// and native async fn in traits does not support dyn dispatch.
#[async_trait]
pub trait SessionStore: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns `None` for unknown or expired sessions.
    async fn get(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionError>;

    /// Last write wins.
    async fn put(&self, id: &SessionId, record: SessionRecord) -> Result<(), SessionError>;

    async fn remove(&self, id: &SessionId) -> Result<(), SessionError>;

    /// Drop expired records, returning how many were removed. Stores that
    /// expire entries on their own leave this as a no-op.
    async fn purge_expired(&self) -> Result<usize, SessionError> {
        Ok(0)
    }
}

pub async fn build_store(config: &SessionConfig) -> Result<Arc<dyn SessionStore>, EdgeError> {
    let ttl = Duration::from_secs(config.ttl);
    match config.store {
        StoreKind::Memory => Ok(Arc::new(memory::MemoryStore::new(ttl))),

        #[cfg(feature = "redis")]
        StoreKind::Redis => {
            let url = config.redis_url.as_deref().unwrap_or_default();
            let store = redis_store::RedisStore::connect(url, ttl).await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "redis"))]
        StoreKind::Redis => Err(EdgeError::Session(SessionError::Unavailable {
            store: "redis",
            source: "built without the `redis` feature".into(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_parse_back() {
        let id = SessionId::generate();
        assert_eq!(SessionId::parse(id.as_str()), Some(id));
    }

    #[test]
    fn rejects_unsafe_ids() {
        assert!(SessionId::parse("").is_none());
        assert!(SessionId::parse("a b").is_none());
        assert!(SessionId::parse("id;path=/").is_none());
        assert!(SessionId::parse(&"x".repeat(129)).is_none());
        assert!(SessionId::parse("abc_DEF-123").is_some());
    }
}
