//! Argument types and specifications.
//!
//! This module defines:
//!
//! - [`ArgumentType`] - The semantic type of a single argument
//! - [`ArgumentSpecification`] - Which arguments a data source accepts
//! - [`Arguments`] - Validated arguments handed to a data source

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Name of the optional argument that pretty-prints JSON results.
pub const PRETTY_ARG: &str = "pretty";

/// Name of the optional argument that selects a key from JSON results.
pub const JSON_KEY_ARG: &str = "json_key";

/// The semantic type of an argument.
///
/// Every type has a fixed validation rule, see
/// [`ArgumentValidator`](crate::validate::ArgumentValidator).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ArgumentType {
    /// A user ID.
    #[serde(rename = "UserID")]
    UserId,
    /// A group ID.
    #[serde(rename = "GroupID")]
    GroupId,
    /// A badge ID.
    #[serde(rename = "BadgeID")]
    BadgeId,
    /// An asset ID.
    #[serde(rename = "AssetID")]
    AssetId,
    /// A universe (experience) ID.
    #[serde(rename = "UniverseID")]
    UniverseId,
    /// A place ID.
    #[serde(rename = "PlaceID")]
    PlaceId,
    /// A username.
    Username,
    /// A thumbnail size such as `140x140`.
    ThumbnailSize,
    /// `true` or `false`.
    Boolean,
    /// Any string.
    String,
    /// An image format accepted by the thumbnail API.
    ThumbnailFormat,
    /// What the thumbnail API returns while an image is not ready.
    ReturnPolicy,
    /// Page size accepted by the user games API.
    UserGamesLimit,
    /// `Asc` or `Desc`.
    SortOrder,
}

impl ArgumentType {
    /// All argument types.
    pub const ALL: [Self; 14] = [
        Self::UserId,
        Self::GroupId,
        Self::BadgeId,
        Self::AssetId,
        Self::UniverseId,
        Self::PlaceId,
        Self::Username,
        Self::ThumbnailSize,
        Self::Boolean,
        Self::String,
        Self::ThumbnailFormat,
        Self::ReturnPolicy,
        Self::UserGamesLimit,
        Self::SortOrder,
    ];

    /// Returns the configuration name of this type (e.g. `UserID`).
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UserId => "UserID",
            Self::GroupId => "GroupID",
            Self::BadgeId => "BadgeID",
            Self::AssetId => "AssetID",
            Self::UniverseId => "UniverseID",
            Self::PlaceId => "PlaceID",
            Self::Username => "Username",
            Self::ThumbnailSize => "ThumbnailSize",
            Self::Boolean => "Boolean",
            Self::String => "String",
            Self::ThumbnailFormat => "ThumbnailFormat",
            Self::ReturnPolicy => "ReturnPolicy",
            Self::UserGamesLimit => "UserGamesLimit",
            Self::SortOrder => "SortOrder",
        }
    }

    /// Returns true if values of this type are numeric IDs.
    #[must_use]
    pub const fn is_id(&self) -> bool {
        matches!(
            self,
            Self::UserId
                | Self::GroupId
                | Self::BadgeId
                | Self::AssetId
                | Self::UniverseId
                | Self::PlaceId
        )
    }

    /// Returns the message key used when a value of this type is malformed.
    #[must_use]
    pub const fn invalid_code(&self) -> &'static str {
        match self {
            Self::UserId
            | Self::GroupId
            | Self::BadgeId
            | Self::AssetId
            | Self::UniverseId
            | Self::PlaceId => "robloxapi-error-invalid-id",
            Self::Username => "robloxapi-error-invalid-username",
            Self::ThumbnailSize => "robloxapi-error-invalid-thumbnail-size",
            Self::Boolean => "robloxapi-error-invalid-boolean",
            Self::String => "robloxapi-error-invalid-string",
            Self::ThumbnailFormat => "robloxapi-error-invalid-thumbnail-format",
            Self::ReturnPolicy => "robloxapi-error-invalid-return-policy",
            Self::UserGamesLimit => "robloxapi-error-invalid-user-games-limit",
            Self::SortOrder => "robloxapi-error-invalid-sort-order",
        }
    }
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArgumentType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| ConfigError::UnknownArgumentType(s.to_string()))
    }
}

/// The arguments a data source accepts.
///
/// Required arguments are matched by position, optional arguments by
/// case-insensitive name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArgumentSpecification {
    required: Vec<ArgumentType>,
    optional: BTreeMap<String, ArgumentType>,
}

impl ArgumentSpecification {
    /// Creates a specification with the given required argument types.
    #[must_use]
    pub fn new(required: impl IntoIterator<Item = ArgumentType>) -> Self {
        Self {
            required: required.into_iter().collect(),
            optional: BTreeMap::new(),
        }
    }

    /// Appends a required argument.
    #[must_use]
    pub fn with_required(mut self, arg_type: ArgumentType) -> Self {
        self.required.push(arg_type);
        self
    }

    /// Adds an optional argument.
    #[must_use]
    pub fn with_optional(mut self, name: impl Into<String>, arg_type: ArgumentType) -> Self {
        self.optional.insert(name.into(), arg_type);
        self
    }

    /// Adds the `pretty` and `json_key` options used to format JSON results.
    #[must_use]
    pub fn with_json_args(self) -> Self {
        self.with_optional(PRETTY_ARG, ArgumentType::Boolean)
            .with_optional(JSON_KEY_ARG, ArgumentType::String)
    }

    /// Returns the required argument types in order.
    #[must_use]
    pub fn required(&self) -> &[ArgumentType] {
        &self.required
    }

    /// Returns the optional arguments keyed by their declared name.
    #[must_use]
    pub const fn optional(&self) -> &BTreeMap<String, ArgumentType> {
        &self.optional
    }

    /// Looks up an optional argument, ignoring case.
    ///
    /// Returns the declared spelling of the name together with its type.
    #[must_use]
    pub fn optional_argument(&self, name: &str) -> Option<(&str, ArgumentType)> {
        self.optional
            .iter()
            .find(|(declared, _)| declared.eq_ignore_ascii_case(name))
            .map(|(declared, arg_type)| (declared.as_str(), *arg_type))
    }
}

/// Validated arguments for a data source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Arguments {
    required: Vec<String>,
    optional: BTreeMap<String, String>,
}

impl Arguments {
    /// Creates arguments from already validated values.
    #[must_use]
    pub fn new(required: Vec<String>, optional: BTreeMap<String, String>) -> Self {
        Self { required, optional }
    }

    /// Creates arguments with only required values.
    #[must_use]
    pub fn required_only<S: Into<String>>(required: impl IntoIterator<Item = S>) -> Self {
        Self::new(required.into_iter().map(Into::into).collect(), BTreeMap::new())
    }

    /// Adds an optional value.
    #[must_use]
    pub fn with_optional(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.optional.insert(name.into(), value.into());
        self
    }

    /// Returns the required values in order.
    #[must_use]
    pub fn required_values(&self) -> &[String] {
        &self.required
    }

    /// Returns the required value at `index`, or an empty string.
    #[must_use]
    pub fn required(&self, index: usize) -> &str {
        self.required.get(index).map_or("", String::as_str)
    }

    /// Returns all optional values keyed by their declared name.
    #[must_use]
    pub const fn optional_values(&self) -> &BTreeMap<String, String> {
        &self.optional
    }

    /// Returns an optional value.
    #[must_use]
    pub fn optional(&self, name: &str) -> Option<&str> {
        self.optional.get(name).map(String::as_str)
    }

    /// Returns an optional value or `default` if it was not supplied.
    #[must_use]
    pub fn optional_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.optional(name).unwrap_or(default)
    }

    /// Returns a copy that keeps only the listed optional values.
    #[must_use]
    pub fn retain_optional(&self, names: &[&str]) -> Self {
        Self {
            required: self.required.clone(),
            optional: self
                .optional
                .iter()
                .filter(|(name, _)| names.contains(&name.as_str()))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        }
    }
}
