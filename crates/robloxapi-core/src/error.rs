//! Error types for data source operations.
//!
//! [`ApiError`] covers every failure a caller can trigger through an
//! invocation: bad arguments, unknown data sources, failed requests and data
//! that does not have the expected shape. Each variant carries a stable
//! [`code`](ApiError::code) and its [`params`](ApiError::params) so the host
//! can translate it into user-facing text.
//!
//! [`ConfigError`] is the fatal counterpart: it is only produced while the
//! configuration is validated at start-up and never from an invocation.

use thiserror::Error;

use crate::args::ArgumentType;

/// Errors that can occur while invoking a data source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The call did not name a data source at all.
    #[error("No arguments were provided")]
    NoArguments,

    /// Fewer positional arguments were supplied than the source requires.
    #[error("Missing required argument of type {0}")]
    MissingArgument(ArgumentType),

    /// A positional argument was supplied where only `name=value` pairs are accepted.
    #[error("Too many required arguments were provided")]
    TooManyRequiredArguments,

    /// An optional argument was given without a value.
    #[error("Optional argument {0} has no value")]
    MissingOptionalArgumentValue(String),

    /// The source does not declare an optional argument with this name.
    #[error("Unknown optional argument: {0}")]
    UnknownOptionalArgument(String),

    /// A value does not have the format its type requires.
    #[error("Invalid {arg_type} argument: {value}")]
    InvalidArgument {
        /// The declared type of the argument.
        arg_type: ArgumentType,
        /// The rejected value.
        value: String,
    },

    /// A value is well-formed but excluded by the configured allow-list.
    #[error("Argument {value} of type {arg_type} is not allowed")]
    ArgNotAllowed {
        /// The declared type of the argument.
        arg_type: ArgumentType,
        /// The rejected value.
        value: String,
    },

    /// No enabled data source has this identifier.
    #[error("Data source not found: {0}")]
    DataSourceNotFound(String),

    /// The HTTP request failed or returned a non-success status.
    #[error("Request to {endpoint} failed{}", status_suffix(.status))]
    RequestFailed {
        /// The endpoint that was requested.
        endpoint: String,
        /// The HTTP status, if a response was received.
        status: Option<u16>,
    },

    /// The response body was empty or not valid JSON.
    #[error("Failed to decode the response")]
    DecodeFailure,

    /// The data returned by the API failed this source's checks.
    #[error("Invalid data was returned")]
    InvalidData,

    /// A dependency returned nothing.
    #[error("The data source returned no data")]
    NoData,

    /// A dependency returned data of an unexpected shape.
    #[error("The data source returned an unexpected data structure")]
    UnexpectedDataStructure,

    /// The user is not a member of the requested group.
    #[error("The user is not in the group")]
    UserGroupNotFound,

    /// A data source was used more often than allowed within one render.
    #[error("Data source {source_id} may only be used {limit} times")]
    UsageLimit {
        /// The limited data source.
        source_id: String,
        /// The configured limit.
        limit: u32,
    },

    /// Like [`ApiError::UsageLimit`], but reached through a dependent source.
    #[error("Data source {source_id} (used by {dependent_id}) may only be used {limit} times")]
    UsageLimitDependent {
        /// The limited data source.
        source_id: String,
        /// The configured limit.
        limit: u32,
        /// The dependent source that was invoked.
        dependent_id: String,
    },

    /// Error interacting with the cache backend.
    #[error("Cache error: {0}")]
    Cache(String),
}

impl ApiError {
    /// Returns the stable message key for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoArguments => "robloxapi-error-no-arguments",
            Self::MissingArgument(_) => "robloxapi-error-missing-argument",
            Self::TooManyRequiredArguments => "robloxapi-error-too-many-required-arguments",
            Self::MissingOptionalArgumentValue(_) => "robloxapi-error-missing-optional-argument-value",
            Self::UnknownOptionalArgument(_) => "robloxapi-error-unknown-optional-argument",
            Self::InvalidArgument { arg_type, .. } => arg_type.invalid_code(),
            Self::ArgNotAllowed { .. } => "robloxapi-error-arg-not-allowed",
            Self::DataSourceNotFound(_) => "robloxapi-error-datasource-not-found",
            Self::RequestFailed { .. } => "robloxapi-error-request-failed",
            Self::DecodeFailure => "robloxapi-error-decode-failure",
            Self::InvalidData => "robloxapi-error-invalid-data",
            Self::NoData => "robloxapi-error-datasource-returned-no-data",
            Self::UnexpectedDataStructure => "robloxapi-error-unexpected-data-structure",
            Self::UserGroupNotFound => "robloxapi-error-user-group-not-found",
            Self::UsageLimit { .. } => "robloxapi-error-usage-limit",
            Self::UsageLimitDependent { .. } => "robloxapi-error-usage-limit-dependent",
            Self::Cache(_) => "robloxapi-error-cache",
        }
    }

    /// Returns the message parameters, in the order the message expects them.
    #[must_use]
    pub fn params(&self) -> Vec<String> {
        match self {
            Self::MissingArgument(arg_type) => vec![arg_type.to_string()],
            Self::MissingOptionalArgumentValue(name) | Self::UnknownOptionalArgument(name) => {
                vec![name.clone()]
            }
            Self::InvalidArgument { value, .. } => vec![value.clone()],
            Self::ArgNotAllowed { arg_type, value } => vec![value.clone(), arg_type.to_string()],
            Self::DataSourceNotFound(id) => vec![id.clone()],
            Self::UsageLimit { source_id, limit } => vec![source_id.clone(), limit.to_string()],
            Self::UsageLimitDependent {
                source_id,
                limit,
                dependent_id,
            } => vec![source_id.clone(), limit.to_string(), dependent_id.clone()],
            Self::Cache(message) => vec![message.clone()],
            _ => Vec::new(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" with status {s}")).unwrap_or_default()
}

/// Result type alias using [`ApiError`].
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors in the configuration. These indicate a broken deployment and are
/// raised while wiring the service, never while handling a call.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An argument allow-list refers to a type that does not exist.
    #[error("Unknown argument type: {0}")]
    UnknownArgumentType(String),

    /// Outbound requests would time out immediately.
    #[error("Request timeout must be at least one second")]
    ZeroRequestTimeout,

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
