//! Cache trait for storing fetched API responses.
//!
//! This module defines the [`ResultCache`] trait that provides a unified
//! interface for caching decoded responses, and [`CacheKey`], the fingerprint
//! every implementation stores entries under.

use async_trait::async_trait;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::Duration;

use crate::{args::Arguments, error::Result};

/// Optional arguments that change the fetched payload and therefore the cache key.
///
/// Options such as `pretty` or `json_key` only change how an already fetched
/// payload is presented and must never be listed here.
pub const CACHE_AFFECTING_ARGS: &[&str] =
    &["is_circular", "format", "return_policy", "limit", "sort_order"];

/// Fingerprint of a request: endpoint, required values and the
/// cache-affecting optional values.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for an endpoint and its arguments.
    #[must_use]
    pub fn new(endpoint: &str, args: &Arguments) -> Self {
        let affecting = args.retain_optional(CACHE_AFFECTING_ARGS);
        let required = serde_json::to_string(affecting.required_values()).unwrap_or_default();
        let optional = serde_json::to_string(affecting.optional_values()).unwrap_or_default();

        let mut hasher = Sha256::new();
        hasher.update(endpoint.as_bytes());
        hasher.update([0]);
        hasher.update(required.as_bytes());
        hasher.update([0]);
        hasher.update(optional.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Returns the key as a hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trait for caching fetched API responses.
///
/// Implementations must be safe for concurrent readers and writers; the last
/// write for a key wins.
#[async_trait]
pub trait ResultCache: Send + Sync + fmt::Debug {
    /// Retrieves a cached response.
    ///
    /// Returns `Ok(Some(value))` if a live entry exists, `Ok(None)` if not
    /// cached or expired.
    async fn get(&self, endpoint: &str, args: &Arguments) -> Result<Option<Value>>;

    /// Stores a response that expires after `expiry`.
    async fn put(
        &self,
        endpoint: &str,
        args: &Arguments,
        value: &Value,
        expiry: Duration,
    ) -> Result<()>;

    /// Removes expired entries.
    ///
    /// Returns the number of entries removed.
    async fn invalidate_stale(&self) -> Result<usize>;

    /// Clears all cached data.
    async fn clear(&self) -> Result<()>;
}
