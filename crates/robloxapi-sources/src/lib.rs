#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/robloxapi-rs/robloxapi/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Data sources for the Roblox web API.
//!
//! This crate provides the [`Fetcher`], which performs cached requests through
//! an [`HttpTransport`], and every built-in data source:
//!
//! - Endpoint-backed sources such as `gameData`, `userId` and the thumbnail sources
//! - Simple sources built from a [`SimpleEndpoint`]
//! - Dependent sources derived from other sources, such as `groupRank`
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use robloxapi_core::{Arguments, Config, DataSource};
//! use robloxapi_cache::InMemoryCache;
//! use robloxapi_sources::{Fetcher, ReqwestTransport, game::game_data};
//!
//! # async fn example() -> robloxapi_core::Result<()> {
//! let fetcher = Fetcher::new(
//!     Arc::new(ReqwestTransport::new()),
//!     Arc::new(InMemoryCache::new()),
//!     Arc::new(Config::default()),
//! );
//! let source = game_data(Arc::new(fetcher));
//! let game = source.exec(&Arguments::required_only(["6483209208", "132813250731469"])).await?;
//! println!("{}", game["name"]);
//! # Ok(())
//! # }
//! ```

/// Built-in data source catalogue.
pub mod catalogue;
/// Data sources derived from other data sources.
pub mod dependent;
/// Endpoint strategies and the generic endpoint-backed data source.
pub mod endpoint;
/// Cached endpoint access.
pub mod fetcher;
/// The `gameData` data source.
pub mod game;
/// Simple data sources.
pub mod simple;
/// Thumbnail data sources.
pub mod thumbnail;
/// HTTP transport abstraction.
pub mod transport;
/// The `userId` data source.
pub mod user_id;

/// Scripted transport for tests.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use catalogue::{DEPENDENT_SOURCES, DependentFactory, all_source_ids, independent_sources};
pub use dependent::{Derivation, DependentDataSource};
pub use endpoint::{Endpoint, FetcherDataSource};
pub use fetcher::{Fetcher, RequestOptions};
pub use simple::SimpleEndpoint;
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError,
};
