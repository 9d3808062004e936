//! Argument validation.
//!
//! [`ArgumentValidator`] turns the raw tokens of a call into [`Arguments`]:
//! it matches them against an [`ArgumentSpecification`], checks every value
//! against the rule of its [`ArgumentType`] and then against the configured
//! allow-list for that type.

use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;
use tracing::trace;

use crate::{
    args::{ArgumentSpecification, ArgumentType, Arguments},
    config::Config,
    error::{ApiError, ConfigError, Result},
};

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,16}$").expect("valid id pattern"));

static THUMBNAIL_SIZE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}x\d{1,3}$").expect("valid thumbnail size pattern"));

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{3,20}$").expect("valid username pattern"));

const THUMBNAIL_FORMATS: &[&str] = &["Png", "Jpeg", "Webp"];
const RETURN_POLICIES: &[&str] = &["PlaceHolder", "ForcePlaceHolder", "AutoGenerated"];
const USER_GAMES_LIMITS: &[&str] = &["10", "25", "50"];
const SORT_ORDERS: &[&str] = &["Asc", "Desc"];

/// Checks whether a string is a valid numeric ID (1 to 16 digits).
#[must_use]
pub fn is_valid_id(value: &str) -> bool {
    ID_PATTERN.is_match(value)
}

/// Checks whether every string is a valid numeric ID.
#[must_use]
pub fn are_valid_ids<S: AsRef<str>>(values: &[S]) -> bool {
    values.iter().all(|v| is_valid_id(v.as_ref()))
}

/// Checks whether a string is a valid username.
///
/// Usernames have 3 to 20 letters, digits or underscores and may neither
/// start nor end with an underscore nor contain two in a row.
#[must_use]
pub fn is_valid_username(value: &str) -> bool {
    USERNAME_PATTERN.is_match(value)
        && !value.starts_with('_')
        && !value.ends_with('_')
        && !value.contains("__")
}

/// Checks whether `value` is well-formed for `arg_type`.
#[must_use]
pub fn is_valid_value(arg_type: ArgumentType, value: &str) -> bool {
    match arg_type {
        ArgumentType::UserId
        | ArgumentType::GroupId
        | ArgumentType::BadgeId
        | ArgumentType::AssetId
        | ArgumentType::UniverseId
        | ArgumentType::PlaceId => is_valid_id(value),
        ArgumentType::Username => is_valid_username(value),
        ArgumentType::ThumbnailSize => THUMBNAIL_SIZE_PATTERN.is_match(value),
        ArgumentType::Boolean => {
            value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
        }
        ArgumentType::String => true,
        ArgumentType::ThumbnailFormat => THUMBNAIL_FORMATS.contains(&value),
        ArgumentType::ReturnPolicy => RETURN_POLICIES.contains(&value),
        ArgumentType::UserGamesLimit => USER_GAMES_LIMITS.contains(&value),
        ArgumentType::SortOrder => SORT_ORDERS.contains(&value),
    }
}

/// Validates raw call arguments against a specification.
#[derive(Clone, Debug, Default)]
pub struct ArgumentValidator {
    allowed: HashMap<ArgumentType, Vec<String>>,
}

impl ArgumentValidator {
    /// Creates a validator without allow-lists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator from the configured allow-lists.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownArgumentType`] if an allow-list names a
    /// type that does not exist.
    pub fn from_config(config: &Config) -> std::result::Result<Self, ConfigError> {
        let mut validator = Self::new();
        for (type_name, values) in &config.allowed_arguments {
            let arg_type: ArgumentType = type_name.parse()?;
            validator = validator.with_allowed(arg_type, values.iter().cloned());
        }
        Ok(validator)
    }

    /// Restricts the values accepted for `arg_type`.
    ///
    /// An empty list accepts every well-formed value.
    #[must_use]
    pub fn with_allowed(
        mut self,
        arg_type: ArgumentType,
        values: impl IntoIterator<Item = String>,
    ) -> Self {
        self.allowed.insert(arg_type, values.into_iter().collect());
        self
    }

    /// Matches raw tokens against `spec` and validates every value.
    ///
    /// Required arguments are taken by position. All remaining tokens must
    /// be `name=value` pairs naming a declared optional argument.
    ///
    /// # Errors
    /// Returns the [`ApiError`] describing the first problem found.
    pub fn validate<S: AsRef<str>>(
        &self,
        spec: &ArgumentSpecification,
        raw: &[S],
    ) -> Result<Arguments> {
        let mut tokens = raw.iter().map(|t| t.as_ref().trim()).peekable();

        let mut required = Vec::with_capacity(spec.required().len());
        for &arg_type in spec.required() {
            let value = match tokens.peek() {
                Some(token) if !is_named_optional(spec, token) => *token,
                _ => return Err(ApiError::MissingArgument(arg_type)),
            };
            tokens.next();
            self.check(arg_type, value)?;
            required.push(value.to_string());
        }

        let mut optional = BTreeMap::new();
        for (index, token) in tokens.enumerate() {
            let Some((name, value)) = token.split_once('=') else {
                return Err(if index == 0 {
                    ApiError::TooManyRequiredArguments
                } else {
                    ApiError::MissingOptionalArgumentValue(token.to_string())
                });
            };
            let (name, value) = (name.trim(), value.trim());
            let (declared, arg_type) = spec
                .optional_argument(name)
                .ok_or_else(|| ApiError::UnknownOptionalArgument(name.to_string()))?;
            self.check(arg_type, value)?;
            optional.insert(declared.to_string(), value.to_string());
        }

        trace!(
            required = required.len(),
            optional = optional.len(),
            "Validated arguments"
        );
        Ok(Arguments::new(required, optional))
    }

    /// Validates a single value: format first, then the allow-list.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidArgument`] or [`ApiError::ArgNotAllowed`].
    pub fn check(&self, arg_type: ArgumentType, value: &str) -> Result<()> {
        if !is_valid_value(arg_type, value) {
            return Err(ApiError::InvalidArgument {
                arg_type,
                value: value.to_string(),
            });
        }
        self.check_allowed(arg_type, value)
    }

    /// Checks `value` against the allow-list configured for `arg_type`.
    ///
    /// # Errors
    /// Returns [`ApiError::ArgNotAllowed`] if a non-empty allow-list excludes the value.
    pub fn check_allowed(&self, arg_type: ArgumentType, value: &str) -> Result<()> {
        match self.allowed.get(&arg_type) {
            Some(allowed) if !allowed.is_empty() && !allowed.iter().any(|a| a == value) => {
                Err(ApiError::ArgNotAllowed {
                    arg_type,
                    value: value.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Returns true if `token` is a `name=value` pair for a declared optional argument.
fn is_named_optional(spec: &ArgumentSpecification, token: &str) -> bool {
    token
        .split_once('=')
        .is_some_and(|(name, _)| spec.optional_argument(name.trim()).is_some())
}
