//! In-memory [`CacheStore`] with per-entry expiry.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::CacheStore;
use crate::error::{CoreError, CoreResult};

struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

/// Process-local cache.
///
/// Expired entries are dropped lazily: on the `get` that finds them and in a sweep
/// on every `set`.
pub struct MemoryCache {
    name: String,
    default_ttl: Duration,
    max_entry_size: usize,
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new(name: impl Into<String>, default_ttl: Duration, max_entry_size: usize) -> Self {
        Self {
            name: name.into(),
            default_ttl,
            max_entry_size,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|e| e.expires_at > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> CoreResult<Vec<u8>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Ok(entry.value.clone()),
                Some(_) => {}
                None => return Err(CoreError::CacheMiss(key.to_string())),
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.expires_at <= now) {
            entries.remove(key);
            log::debug!("[cache:{}] Evicted expired key {key}", self.name);
        }
        Err(CoreError::CacheMiss(key.to_string()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> CoreResult<()> {
        if value.len() > self.max_entry_size {
            return Err(CoreError::EntryTooLarge {
                key: key.to_string(),
                size: value.len(),
                limit: self.max_entry_size,
            });
        }

        let now = Instant::now();
        let expires_at = now + ttl.unwrap_or(self.default_ttl);
        let mut entries = self.entries.write().await;
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }
}
