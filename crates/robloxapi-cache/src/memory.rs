//! In-memory cache implementation.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use robloxapi_core::{Arguments, CacheKey, Result, ResultCache};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::SWEEP_INTERVAL;

/// Cache entry with its expiry instant.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    cached_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn new(value: Value, expiry: Duration) -> Self {
        let cached_at = Utc::now();
        let ttl = TimeDelta::from_std(expiry).unwrap_or(TimeDelta::MAX);
        Self {
            value,
            cached_at,
            expires_at: cached_at.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-memory result cache.
///
/// Entries are stored in an `RwLock`-protected `HashMap` and are lost when the
/// cache is dropped. Expired entries read as absent. They are evicted on the
/// next read of their key, by [`ResultCache::invalidate_stale`], and by the
/// sweep that runs every [`SWEEP_INTERVAL`] writes.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    writes: AtomicUsize,
}

impl InMemoryCache {
    /// Create a new empty in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries, including expired ones not yet evicted.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl ResultCache for InMemoryCache {
    #[instrument(skip(self, args), fields(endpoint = %endpoint))]
    async fn get(&self, endpoint: &str, args: &Arguments) -> Result<Option<Value>> {
        let key = CacheKey::new(endpoint, args);
        let now = Utc::now();

        {
            let entries = self.entries.read().await;
            match entries.get(&key) {
                Some(entry) if !entry.is_stale(now) => {
                    debug!(cached_at = %entry.cached_at, "Cache hit");
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
                None => {
                    debug!("Cache miss");
                    return Ok(None);
                }
            }
        }

        let mut entries = self.entries.write().await;
        // Another writer may have refreshed the entry in the meantime.
        if entries.get(&key).is_some_and(|entry| entry.is_stale(now)) {
            entries.remove(&key);
            debug!("Evicted expired entry");
        }
        Ok(None)
    }

    #[instrument(skip(self, args, value), fields(endpoint = %endpoint, expiry_secs = expiry.as_secs()))]
    async fn put(
        &self,
        endpoint: &str,
        args: &Arguments,
        value: &Value,
        expiry: Duration,
    ) -> Result<()> {
        let key = CacheKey::new(endpoint, args);
        let mut entries = self.entries.write().await;

        if (self.writes.fetch_add(1, Ordering::Relaxed) + 1) % SWEEP_INTERVAL == 0 {
            let now = Utc::now();
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_stale(now));
            debug!(removed = before - entries.len(), "Swept expired entries");
        }

        entries.insert(key, CacheEntry::new(value.clone(), expiry));
        debug!("Cached response");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn invalidate_stale(&self) -> Result<usize> {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_stale(now));
        let removed = before - entries.len();

        if removed > 0 {
            debug!("Invalidated {} stale cache entries", removed);
        }

        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        self.entries.write().await.clear();
        debug!("Cleared all cache entries");
        Ok(())
    }
}
