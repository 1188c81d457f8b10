//! Time-bounded key/value cache shared by the collection passes and the exposition layer.

mod keys;
mod memory;

pub use keys::{cache_key, custom_records_key, MetricName, CUSTOM_RECORDS};
pub use memory::MemoryCache;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CoreResult;

/// Byte-valued cache with per-entry expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Current value of `key`.
    ///
    /// # Errors
    /// [`CoreError::CacheMiss`](crate::CoreError::CacheMiss) when the key is absent or expired.
    async fn get(&self, key: &str) -> CoreResult<Vec<u8>>;

    /// Store `value` under `key`; `ttl` of `None` uses the store's default.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> CoreResult<()>;
}
