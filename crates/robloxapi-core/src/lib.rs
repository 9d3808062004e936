#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/robloxapi-rs/robloxapi/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for Roblox API data sources.
//!
//! This crate provides the foundational abstractions shared by every data source:
//!
//! - [`DataSource`](source::DataSource) - Base trait for all data sources
//! - [`ArgumentSpecification`](args::ArgumentSpecification) - Accepted arguments
//! - [`ArgumentValidator`](validate::ArgumentValidator) - Parsing and type checks
//! - [`ResultCache`](cache::ResultCache) - Caching abstraction
//! - [`Config`](config::Config) - Service configuration

/// Argument types and specifications.
pub mod args;
/// Cache trait and key derivation.
pub mod cache;
/// Image URL provenance checks.
pub mod cdn;
/// Service configuration.
pub mod config;
/// Error types for data source operations.
pub mod error;
/// Result formatting.
pub mod json;
/// Data source traits.
pub mod source;
/// Argument validation.
pub mod validate;

// Re-export commonly used items at crate root
pub use args::{ArgumentSpecification, ArgumentType, Arguments};
pub use cache::{CacheKey, ResultCache};
pub use cdn::is_roblox_cdn_url;
pub use config::Config;
pub use error::{ApiError, ConfigError, Result};
pub use json::{Output, create_json_result};
pub use source::{DataSource, SourceResolver};
pub use validate::{ArgumentValidator, are_valid_ids, is_valid_id};
