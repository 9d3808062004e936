//! No-op cache implementation.

use async_trait::async_trait;
use robloxapi_core::{Arguments, Result, ResultCache};
use serde_json::Value;
use std::time::Duration;
use tracing::trace;

/// A cache that never stores anything.
///
/// Selected when `disable_cache` is set, so every call reaches the Roblox API.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl NoopCache {
    /// Create a new no-op cache.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResultCache for NoopCache {
    async fn get(&self, endpoint: &str, _args: &Arguments) -> Result<Option<Value>> {
        trace!(%endpoint, "Caching disabled, lookup skipped");
        Ok(None)
    }

    async fn put(
        &self,
        endpoint: &str,
        _args: &Arguments,
        _value: &Value,
        _expiry: Duration,
    ) -> Result<()> {
        trace!(%endpoint, "Caching disabled, response dropped");
        Ok(())
    }

    async fn invalidate_stale(&self) -> Result<usize> {
        Ok(0)
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_noop_cache_never_hits() {
        let cache = NoopCache::new();
        let args = Arguments::required_only(["1"]);
        let endpoint = "https://groups.roblox.com/v1/groups/1";

        cache
            .put(endpoint, &args, &json!({"id": 1}), Duration::from_secs(600))
            .await
            .unwrap();
        assert!(cache.get(endpoint, &args).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_noop_cache_management() {
        let cache = NoopCache::new();
        assert_eq!(cache.invalidate_stale().await.unwrap(), 0);
        assert!(cache.clear().await.is_ok());
    }
}
