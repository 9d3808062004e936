//! SQLite-based cache implementation.

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use robloxapi_core::{ApiError, Arguments, CacheKey, Result, ResultCache};
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::SWEEP_INTERVAL;

/// SQLite-based result cache.
///
/// This cache stores decoded responses in a SQLite database file, so cached
/// results survive restarts and can be shared between processes. Expired
/// rows are deleted every [`SWEEP_INTERVAL`] writes.
#[derive(Debug)]
pub struct SqliteCache {
    conn: Mutex<Connection>,
    writes: AtomicUsize,
}

impl SqliteCache {
    /// Create a new SQLite cache at the given path.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or schema creation fails.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| ApiError::Cache(e.to_string()))?;
        let cache = Self {
            conn: Mutex::new(conn),
            writes: AtomicUsize::new(0),
        };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Create an in-memory SQLite cache.
    ///
    /// Useful for testing; data is lost when the cache is dropped.
    ///
    /// # Errors
    /// Returns an error if schema creation fails.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| ApiError::Cache(e.to_string()))?;
        let cache = Self {
            conn: Mutex::new(conn),
            writes: AtomicUsize::new(0),
        };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ApiError::Cache(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS result_cache (
                fingerprint TEXT PRIMARY KEY NOT NULL,
                endpoint TEXT NOT NULL,
                data_json TEXT NOT NULL,
                cached_at TEXT NOT NULL,
                expires_at INTEGER NOT NULL
            )",
            [],
        )
        .map_err(|e| ApiError::Cache(e.to_string()))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_result_cache_expires_at
             ON result_cache(expires_at)",
            [],
        )
        .map_err(|e| ApiError::Cache(e.to_string()))?;

        debug!("SQLite cache schema initialized");
        Ok(())
    }

    /// Returns the number of stored rows, including expired ones not yet deleted.
    ///
    /// # Errors
    /// Returns an error if the table cannot be read.
    pub fn len(&self) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ApiError::Cache(e.to_string()))?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM result_cache", [], |row| row.get(0))
            .map_err(|e| ApiError::Cache(e.to_string()))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Returns true if no row is stored.
    ///
    /// # Errors
    /// Returns an error if the table cannot be read.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

fn delete_stale(conn: &Connection) -> Result<usize> {
    let now = Utc::now().timestamp_millis();
    conn.execute("DELETE FROM result_cache WHERE expires_at <= ?1", params![now])
        .map_err(|e| ApiError::Cache(e.to_string()))
}

#[async_trait]
impl ResultCache for SqliteCache {
    #[instrument(skip(self, args), fields(endpoint = %endpoint))]
    async fn get(&self, endpoint: &str, args: &Arguments) -> Result<Option<Value>> {
        let key = CacheKey::new(endpoint, args);
        let now = Utc::now().timestamp_millis();

        let conn = self
            .conn
            .lock()
            .map_err(|e| ApiError::Cache(e.to_string()))?;

        let row: Option<String> = conn
            .query_row(
                "SELECT data_json FROM result_cache
                 WHERE fingerprint = ?1 AND expires_at > ?2",
                params![key.as_str(), now],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| ApiError::Cache(e.to_string()))?;

        let Some(json) = row else {
            debug!("Cache miss");
            return Ok(None);
        };

        match serde_json::from_str(&json) {
            Ok(value) => {
                debug!("Cache hit");
                Ok(Some(value))
            }
            Err(e) => {
                // Treat unreadable rows as misses; the next put replaces them.
                warn!(error = %e, "Discarding unreadable cache entry");
                Ok(None)
            }
        }
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
        let data_json = serde_json::to_string(value).map_err(|e| ApiError::Cache(e.to_string()))?;

        let cached_at = Utc::now();
        let ttl = TimeDelta::from_std(expiry).unwrap_or(TimeDelta::MAX);
        let expires_at = cached_at
            .checked_add_signed(ttl)
            .map_or(i64::MAX, |t| t.timestamp_millis());

        let conn = self
            .conn
            .lock()
            .map_err(|e| ApiError::Cache(e.to_string()))?;

        if (self.writes.fetch_add(1, Ordering::Relaxed) + 1) % SWEEP_INTERVAL == 0 {
            let removed = delete_stale(&conn)?;
            debug!(removed, "Swept expired entries");
        }

        conn.execute(
            "INSERT OR REPLACE INTO result_cache
             (fingerprint, endpoint, data_json, cached_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                key.as_str(),
                endpoint,
                data_json,
                cached_at.to_rfc3339(),
                expires_at
            ],
        )
        .map_err(|e| ApiError::Cache(e.to_string()))?;

        debug!("Cached response");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn invalidate_stale(&self) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ApiError::Cache(e.to_string()))?;

        let removed = delete_stale(&conn)?;

        if removed > 0 {
            debug!("Invalidated {} stale cache entries", removed);
        }

        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ApiError::Cache(e.to_string()))?;

        conn.execute("DELETE FROM result_cache", [])
            .map_err(|e| ApiError::Cache(e.to_string()))?;

        debug!("Cleared all cache entries");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ENDPOINT: &str = "https://thumbnails.roblox.com/v1/users/avatar?userIds=1";

    #[tokio::test]
    async fn test_sqlite_cache_initialization() {
        let cache = SqliteCache::in_memory();
        assert!(cache.is_ok());
    }

    #[tokio::test]
    async fn test_result_roundtrip() {
        let cache = SqliteCache::in_memory().unwrap();
        let args = Arguments::required_only(["1", "140x140"]).with_optional("format", "Webp");

        // Initially no data
        assert!(cache.get(ENDPOINT, &args).await.unwrap().is_none());

        let value = json!([{"targetId": 1, "state": "Completed", "imageUrl": "https://tr.rbxcdn.com/x/noFilter"}]);
        cache
            .put(ENDPOINT, &args, &value, Duration::from_secs(600))
            .await
            .unwrap();

        assert_eq!(cache.get(ENDPOINT, &args).await.unwrap(), Some(value));

        // A different format is a different request.
        let png = Arguments::required_only(["1", "140x140"]).with_optional("format", "Png");
        assert!(cache.get(ENDPOINT, &png).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_and_expiry() {
        let cache = SqliteCache::in_memory().unwrap();
        let args = Arguments::required_only(["1"]);

        cache
            .put(ENDPOINT, &args, &json!(1), Duration::from_secs(600))
            .await
            .unwrap();
        cache
            .put(ENDPOINT, &args, &json!(2), Duration::from_secs(600))
            .await
            .unwrap();
        assert_eq!(cache.get(ENDPOINT, &args).await.unwrap(), Some(json!(2)));

        cache
            .put(ENDPOINT, &args, &json!(3), Duration::ZERO)
            .await
            .unwrap();
        assert!(cache.get(ENDPOINT, &args).await.unwrap().is_none());
        assert_eq!(cache.invalidate_stale().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_writes_sweep_expired_rows() {
        let cache = SqliteCache::in_memory().unwrap();
        for i in 0..200 {
            let args = Arguments::required_only([i.to_string()]);
            cache
                .put(ENDPOINT, &args, &json!(i), Duration::ZERO)
                .await
                .unwrap();
        }
        let fresh = Arguments::required_only(["fresh"]);
        cache
            .put(ENDPOINT, &fresh, &json!(1), Duration::from_secs(600))
            .await
            .unwrap();

        assert!(cache.len().unwrap() <= SWEEP_INTERVAL);
        assert_eq!(cache.get(ENDPOINT, &fresh).await.unwrap(), Some(json!(1)));
    }

    #[tokio::test]
    async fn test_clear_cache() {
        let cache = SqliteCache::in_memory().unwrap();
        let args = Arguments::required_only(["1"]);

        cache
            .put(ENDPOINT, &args, &json!({"id": 1}), Duration::from_secs(600))
            .await
            .unwrap();

        cache.clear().await.unwrap();

        assert!(cache.get(ENDPOINT, &args).await.unwrap().is_none());
    }
}
