//! Per-render usage limits.

use std::collections::HashMap;

use tracing::debug;

use robloxapi_core::{ApiError, DataSource, Result};

/// Counts data source calls within one render and enforces usage limits.
///
/// Calls are counted against the source that performs the fetch, so a
/// dependent source shares the budget of the source it depends on.
#[derive(Debug, Default, Clone)]
pub struct UsageTracker {
    counts: HashMap<String, u32>,
}

impl UsageTracker {
    /// Create a tracker with all counts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a call to `source` and check it against `limits`.
    ///
    /// Sources without a limit are not counted.
    ///
    /// # Errors
    /// - [`ApiError::UsageLimit`] if the source exceeded its own limit
    /// - [`ApiError::UsageLimitDependent`] if a dependent source exceeded
    ///   the limit of the source it depends on
    pub fn record(&mut self, source: &dyn DataSource, limits: &HashMap<String, u32>) -> Result<()> {
        let fetcher_id = source.fetcher_source_id();
        let Some(&limit) = limits.get(fetcher_id) else {
            return Ok(());
        };

        let used = self.counts.entry(fetcher_id.to_string()).or_insert(0);
        *used += 1;

        if *used <= limit {
            return Ok(());
        }

        debug!(source = %source.id(), used = *used, limit, "Usage limit exceeded");
        if fetcher_id == source.id() {
            Err(ApiError::UsageLimit {
                source_id: fetcher_id.to_string(),
                limit,
            })
        } else {
            Err(ApiError::UsageLimitDependent {
                source_id: fetcher_id.to_string(),
                limit,
                dependent_id: source.id().to_string(),
            })
        }
    }

    /// Returns how often calls to `source_id` were counted.
    #[must_use]
    pub fn count(&self, source_id: &str) -> u32 {
        self.counts.get(source_id).copied().unwrap_or(0)
    }

    /// Reset all counts, e.g. at the start of a new render.
    pub fn reset(&mut self) {
        self.counts.clear();
    }
}
