#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/robloxapi-rs/robloxapi/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # Example
//!
//! ```rust,no_run
//! use robloxapi::{Config, RobloxApi};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let api = RobloxApi::new(Config::default())?;
//! let visits = api.invoke("placeVisits", &["1818", "1818"]).await?;
//! println!("{visits}");
//! # Ok(())
//! # }
//! ```

// Core types and traits
pub use robloxapi_core::*;

// Cache implementations
#[cfg(feature = "cache-sqlite")]
pub use robloxapi_cache::SqliteCache;
pub use robloxapi_cache::{InMemoryCache, NoopCache};

// Fetcher and data sources
pub use robloxapi_sources::{
    DEPENDENT_SOURCES, DependentDataSource, Derivation, Endpoint, Fetcher, FetcherDataSource,
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, SimpleEndpoint,
    TransportError, all_source_ids,
};

mod invoke;
mod registry;
mod usage;

pub use invoke::{LegacyFunction, RobloxApi};
pub use registry::{DataSourceRegistry, LEGACY_ALIAS_PREFIX, legacy_alias};
pub use usage::UsageTracker;
