//! Redis-backed session store.
//!
//! Each record is stored as JSON under `storefront-edge:session:{id}`
//! with `SET EX`, so Redis handles expiry and several edge instances can
//! share sessions.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use super::{SessionId, SessionRecord, SessionStore};
use crate::error::SessionError;

const KEY_PREFIX: &str = "storefront-edge:session:";

fn unavailable(e: redis::RedisError) -> SessionError {
    SessionError::Unavailable {
        store: "redis",
        source: Box::new(e),
    }
}

pub struct RedisStore {
    // Multiplexed: clones share one socket.
    connection: redis::aio::MultiplexedConnection,
    ttl_secs: u64,
}

impl RedisStore {
    pub async fn connect(url: &str, ttl: Duration) -> Result<Self, SessionError> {
        let client = redis::Client::open(url).map_err(unavailable)?;
        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(unavailable)?;

        tracing::info!(url = %url, "connected to redis session store");
        Ok(Self {
            connection,
            ttl_secs: ttl.as_secs().max(1),
        })
    }

    fn key(id: &SessionId) -> String {
        format!("{KEY_PREFIX}{id}")
    }
}

#[async_trait]
impl SessionStore for RedisStore {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionError> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(Self::key(id)).await.map_err(unavailable)?;
        value
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(SessionError::from)
    }

    async fn put(&self, id: &SessionId, record: SessionRecord) -> Result<(), SessionError> {
        let json = serde_json::to_string(&record)?;
        let mut conn = self.connection.clone();
        let (): () = conn
            .set_ex(Self::key(id), json, self.ttl_secs)
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn remove(&self, id: &SessionId) -> Result<(), SessionError> {
        let mut conn = self.connection.clone();
        let _: i64 = conn.del(Self::key(id)).await.map_err(unavailable)?;
        Ok(())
    }
}
