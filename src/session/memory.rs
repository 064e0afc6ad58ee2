//! In-process session store.
//!
//! Records live in a `RwLock<HashMap>` and carry their own deadline.
//! Expired entries are invisible to [`get`](SessionStore::get) right away
//! and physically removed by [`purge_expired`](SessionStore::purge_expired).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::{SessionId, SessionRecord, SessionStore};
use crate::error::SessionError;

/// Deadline used when `now + ttl` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

#[derive(Debug)]
struct Entry {
    record: SessionRecord,
    expires_at: Instant,
}

#[derive(Debug)]
pub struct MemoryStore {
    ttl: Duration,
    entries: RwLock<HashMap<SessionId, Entry>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(id)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.record.clone()))
    }

    async fn put(&self, id: &SessionId, record: SessionRecord) -> Result<(), SessionError> {
        let now = Instant::now();
        let entry = Entry {
            record,
            expires_at: now.checked_add(self.ttl).unwrap_or(now + FAR_FUTURE),
        };
        self.entries.write().await.insert(id.clone(), entry);
        Ok(())
    }

    async fn remove(&self, id: &SessionId) -> Result<(), SessionError> {
        self.entries.write().await.remove(id);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize, SessionError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        Ok(before - entries.len())
    }
}
