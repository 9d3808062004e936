//! Data source registry.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use robloxapi_core::{Config, DataSource, Result, SourceResolver};
use robloxapi_sources::{DEPENDENT_SOURCES, Fetcher, independent_sources};

/// Prefix of legacy alias IDs.
pub const LEGACY_ALIAS_PREFIX: &str = "roblox_";

/// Returns the legacy alias of a data source ID (`gameData` → `roblox_GameData`).
#[must_use]
pub fn legacy_alias(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => format!("{LEGACY_ALIAS_PREFIX}{}{}", first.to_uppercase(), chars.as_str()),
        None => LEGACY_ALIAS_PREFIX.to_string(),
    }
}

/// Registry of enabled data sources.
///
/// Sources are registered once at start-up; afterwards the registry is only
/// read and can be shared behind an `Arc`.
///
/// # Example
///
/// ```rust,ignore
/// use robloxapi::{Config, DataSourceRegistry, SourceResolver};
///
/// let registry = DataSourceRegistry::with_defaults(&config, fetcher);
/// let source = registry.resolve("placevisits", true);
/// ```
#[derive(Default)]
pub struct DataSourceRegistry {
    sources: HashMap<String, Arc<dyn DataSource>>,
    /// Lowercase ID → registered ID.
    aliases: HashMap<String, String>,
    order: Vec<String>,
    enabled: Option<Vec<String>>,
}

impl std::fmt::Debug for DataSourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSourceRegistry")
            .field("sources", &self.order)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl DataSourceRegistry {
    /// Create a new empty registry that accepts every data source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty registry that accepts the sources enabled in `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            enabled: config.enabled_data_sources.clone(),
            ..Default::default()
        }
    }

    /// Create a registry holding every enabled built-in data source.
    ///
    /// Sources backed by an endpoint are registered first, then dependent
    /// sources. A dependent source whose dependency is not enabled is skipped.
    #[must_use]
    pub fn with_defaults(config: &Config, fetcher: Arc<Fetcher>) -> Self {
        let mut registry = Self::from_config(config);

        for source in independent_sources(&fetcher) {
            registry.register(source);
        }
        for (id, factory) in DEPENDENT_SOURCES {
            registry.try_register(id, |resolver| factory(resolver));
        }

        debug!(count = registry.len(), "Data source registry initialized");
        registry
    }

    /// Returns true if the data source may be registered.
    #[must_use]
    pub fn is_enabled(&self, id: &str) -> bool {
        self.enabled
            .as_ref()
            .is_none_or(|enabled| enabled.iter().any(|e| e == id))
    }

    /// Register a data source if it is enabled.
    ///
    /// Returns true if the source was registered. A source with the ID of an
    /// already registered source replaces it.
    pub fn register(&mut self, source: Arc<dyn DataSource>) -> bool {
        let id = source.id().to_string();
        if !self.is_enabled(&id) {
            debug!(source = %id, "Data source disabled, skipping");
            return false;
        }

        debug!(source = %id, "Registering data source");
        let lowercase = id.to_lowercase();
        match self.aliases.get(&lowercase) {
            Some(existing) if *existing != id => {
                warn!(
                    source = %id,
                    existing = %existing,
                    "Case-insensitive lookup already resolves to another data source"
                );
            }
            Some(_) => {}
            None => {
                self.aliases.insert(lowercase, id.clone());
            }
        }

        if self.sources.insert(id.clone(), source).is_none() {
            self.order.push(id);
        }
        true
    }

    /// Build and register a data source that depends on already registered ones.
    ///
    /// Construction failures, such as a missing dependency, are logged and
    /// swallowed. Returns true if the source was registered.
    pub fn try_register<F>(&mut self, id: &str, build: F) -> bool
    where
        F: FnOnce(&Self) -> Result<Arc<dyn DataSource>>,
    {
        if !self.is_enabled(id) {
            debug!(source = %id, "Data source disabled, skipping");
            return false;
        }

        match build(self) {
            Ok(source) => self.register(source),
            Err(e) => {
                debug!(source = %id, error = %e, "Failed to register data source");
                false
            }
        }
    }

    /// Returns the IDs of all registered data sources in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Returns all registered data sources in registration order.
    pub fn sources(&self) -> impl Iterator<Item = &Arc<dyn DataSource>> {
        self.order.iter().filter_map(|id| self.sources.get(id))
    }

    /// Returns the legacy alias of every source that asks for one, in
    /// registration order.
    #[must_use]
    pub fn legacy_aliases(&self) -> Vec<(String, Arc<dyn DataSource>)> {
        self.sources()
            .filter(|source| source.registers_legacy_alias())
            .map(|source| (legacy_alias(source.id()), Arc::clone(source)))
            .collect()
    }

    /// Returns the number of registered data sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if no data source is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl SourceResolver for DataSourceRegistry {
    fn resolve(&self, id: &str, ignore_case: bool) -> Option<Arc<dyn DataSource>> {
        if let Some(source) = self.sources.get(id) {
            return Some(Arc::clone(source));
        }
        if !ignore_case {
            return None;
        }
        self.aliases
            .get(&id.to_lowercase())
            .and_then(|registered| self.sources.get(registered))
            .cloned()
    }
}
