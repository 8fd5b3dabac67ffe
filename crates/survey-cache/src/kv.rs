//! Key-value stores receiving serialized survey entries

use crate::error::CacheWriteError;
use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;

/// External key-value cache
///
/// Single-key writes are atomic at the store boundary.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Write `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: String) -> Result<(), CacheWriteError>;

    /// Read `key`
    async fn get(&self, key: &str) -> Option<String>;
}

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreStats {
    /// Number of entries in cache
    pub entry_count: u64,
}

/// In-process [`KeyValueStore`] backed by moka
#[derive(Debug, Clone)]
pub struct MokaStore {
    inner: Cache<String, String>,
}

impl MokaStore {
    /// Create store with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Create store with time-based expiration
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Invalidate all entries
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            entry_count: self.inner.entry_count(),
        }
    }
}

impl Default for MokaStore {
    /// Create store with default capacity (10,000 entries)
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl KeyValueStore for MokaStore {
    async fn set(&self, key: &str, value: String) -> Result<(), CacheWriteError> {
        self.inner.insert(key.to_string(), value).await;
        Ok(())
    }

    async fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).await
    }
}
