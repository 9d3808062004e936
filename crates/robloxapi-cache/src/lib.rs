#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/robloxapi-rs/robloxapi/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Backends for the [`ResultCache`] trait:
//!
//! - [`InMemoryCache`]: process-local map, the default
//! - `SqliteCache`: entries survive restarts (feature `sqlite`)
//! - [`NoopCache`]: used when caching is disabled

/// Process-local result cache.
pub mod memory;
/// Cache for disabled caching.
pub mod noop;

/// Result cache backed by an SQLite table.
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use robloxapi_core::ResultCache;

/// Number of writes between sweeps of expired entries.
///
/// Backends drop expired entries on every `SWEEP_INTERVAL`th `put`, so a
/// long-running process does not accumulate dead results.
pub const SWEEP_INTERVAL: usize = 64;

pub use memory::InMemoryCache;
pub use noop::NoopCache;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteCache;
