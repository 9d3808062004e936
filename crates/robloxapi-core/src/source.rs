//! Data source traits.
//!
//! This module defines:
//!
//! - [`DataSource`] - A named unit mapping validated arguments to one value
//! - [`SourceResolver`] - Lookup of registered data sources by ID

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

use crate::{
    args::{ArgumentSpecification, Arguments},
    error::{ApiError, Result},
};

/// A data source.
///
/// A data source is either backed by an API endpoint or derives its value
/// from another data source.
#[async_trait]
pub trait DataSource: Send + Sync + Debug {
    /// Returns the unique ID of this data source (e.g., `gameData`).
    fn id(&self) -> &str;

    /// Returns the arguments this data source accepts.
    fn argument_specification(&self) -> &ArgumentSpecification;

    /// Produces the value for already validated arguments.
    async fn exec(&self, args: &Arguments) -> Result<Value>;

    /// Whether this data source is also exposed under a legacy alias.
    fn registers_legacy_alias(&self) -> bool {
        false
    }

    /// Returns the ID of the data source that actually performs the request.
    ///
    /// Dependent data sources report the ID of the source they depend on.
    fn fetcher_source_id(&self) -> &str {
        self.id()
    }
}

/// Resolves registered data sources by ID.
pub trait SourceResolver {
    /// Returns the data source with the given ID.
    ///
    /// With `ignore_case`, IDs are compared case-insensitively.
    fn resolve(&self, id: &str, ignore_case: bool) -> Option<Arc<dyn DataSource>>;

    /// Returns the data source with the given ID (case-sensitive).
    ///
    /// # Errors
    /// Returns [`ApiError::DataSourceNotFound`] if no such source is registered.
    fn resolve_or_fail(&self, id: &str) -> Result<Arc<dyn DataSource>> {
        self.resolve(id, false)
            .ok_or_else(|| ApiError::DataSourceNotFound(id.to_string()))
    }
}
