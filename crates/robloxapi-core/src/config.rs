//! Service configuration.
//!
//! [`Config`] holds everything the host decides about the service: which
//! data sources are enabled, per-type argument allow-lists, cache expiries,
//! the outbound user agent and request timeout, and per-render usage limits.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::{args::ArgumentType, error::ConfigError};

/// Key of the default entry in [`Config::caching_expiries`].
pub const DEFAULT_EXPIRY_KEY: &str = "*";

/// Expiry used when [`Config::caching_expiries`] has no default entry.
pub const DEFAULT_CACHE_EXPIRY_SECS: u64 = 600;

/// Default timeout for outbound requests.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration for the data source service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// IDs of enabled data sources. `None` enables every data source.
    pub enabled_data_sources: Option<Vec<String>>,
    /// Allowed values per argument type name. Missing or empty lists allow every value.
    pub allowed_arguments: HashMap<String, Vec<String>>,
    /// Cache expiry in seconds per data source ID, with `*` as the default.
    pub caching_expiries: HashMap<String, u64>,
    /// User agent sent with every request.
    pub request_user_agent: Option<String>,
    /// Disables the result cache entirely.
    pub disable_cache: bool,
    /// Timeout for a single outbound request, in seconds.
    pub request_timeout_secs: u64,
    /// Maximum number of uses per render, keyed by fetcher data source ID.
    pub usage_limits: HashMap<String, u32>,
    /// Whether legacy single-purpose aliases are exposed.
    pub register_legacy_aliases: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled_data_sources: None,
            allowed_arguments: HashMap::new(),
            caching_expiries: HashMap::from([(
                DEFAULT_EXPIRY_KEY.to_string(),
                DEFAULT_CACHE_EXPIRY_SECS,
            )]),
            request_user_agent: None,
            disable_cache: false,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            usage_limits: HashMap::new(),
            register_legacy_aliases: true,
        }
    }
}

impl Config {
    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    /// Returns an error if the TOML is malformed or fails [`Config::validate`].
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants that cannot be expressed in the types.
    ///
    /// # Errors
    /// - [`ConfigError::UnknownArgumentType`] if an allow-list names an
    ///   unknown argument type
    /// - [`ConfigError::ZeroRequestTimeout`] if `request_timeout_secs` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroRequestTimeout);
        }
        for type_name in self.allowed_arguments.keys() {
            type_name.parse::<ArgumentType>()?;
        }
        Ok(())
    }

    /// Enables only the given data sources.
    #[must_use]
    pub fn with_enabled<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.enabled_data_sources = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Returns true if the data source is enabled.
    #[must_use]
    pub fn is_enabled(&self, id: &str) -> bool {
        self.enabled_data_sources
            .as_ref()
            .is_none_or(|enabled| enabled.iter().any(|e| e == id))
    }

    /// Returns the cache expiry for a data source.
    ///
    /// Falls back to the `*` entry, then to [`DEFAULT_CACHE_EXPIRY_SECS`].
    #[must_use]
    pub fn caching_expiry(&self, id: &str) -> Duration {
        let secs = self
            .caching_expiries
            .get(id)
            .or_else(|| self.caching_expiries.get(DEFAULT_EXPIRY_KEY))
            .copied()
            .unwrap_or(DEFAULT_CACHE_EXPIRY_SECS);
        Duration::from_secs(secs)
    }

    /// Returns the timeout for outbound requests.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the user agent, ignoring empty values.
    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.request_user_agent
            .as_deref()
            .filter(|ua| !ua.trim().is_empty())
    }
}
