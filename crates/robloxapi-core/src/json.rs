//! Formatting of data source values for the host.

use serde_json::Value;
use std::fmt;

use crate::args::{Arguments, JSON_KEY_ARG, PRETTY_ARG};

/// Separator between the segments of a `json_key` path.
pub const JSON_KEY_SEPARATOR: &str = "->";

/// A formatted data source result.
#[derive(Clone, Debug, PartialEq)]
pub enum Output {
    /// A plain value, rendered as is.
    Text(String),
    /// A JSON document. The host should not parse it as markup.
    Json {
        /// The document.
        value: Value,
        /// Whether to render with indentation.
        pretty: bool,
    },
}

impl Output {
    /// Formats a data source value.
    ///
    /// Arrays and objects are formatted with [`create_json_result`], strings
    /// are returned verbatim and other scalars use their JSON spelling.
    #[must_use]
    pub fn from_value(value: Value, args: &Arguments) -> Self {
        match value {
            Value::Array(_) | Value::Object(_) => create_json_result(&value, args),
            Value::String(s) => Self::Text(s),
            Value::Null => Self::Text(String::new()),
            other => Self::Text(other.to_string()),
        }
    }

    /// Returns true if the host should render this output without parsing it.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self, Self::Json { .. })
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Json { value, pretty: true } => write!(f, "{value:#}"),
            Self::Json { value, pretty: false } => write!(f, "{value}"),
        }
    }
}

/// Follows a `->` separated path of object keys and array indices.
///
/// Returns `None` if any segment is missing or points into a scalar.
#[must_use]
pub fn json_key<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split(JSON_KEY_SEPARATOR)
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Formats a JSON value using the `json_key` and `pretty` arguments.
///
/// A missing key yields `null`. A string selected by `json_key` is returned
/// as plain text.
#[must_use]
pub fn create_json_result(value: &Value, args: &Arguments) -> Output {
    let pretty = args
        .optional(PRETTY_ARG)
        .is_some_and(|p| p.eq_ignore_ascii_case("true"));

    let selected = match args.optional(JSON_KEY_ARG) {
        Some(path) => json_key(value, path).cloned().unwrap_or(Value::Null),
        None => value.clone(),
    };

    match selected {
        Value::String(s) => Output::Text(s),
        value => Output::Json { value, pretty },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user() -> Value {
        json!({
            "requestedUsername": "abaddriverlol",
            "hasVerifiedBadge": false,
            "id": 4182456156_u64,
            "name": "abaddriverlol",
            "displayName": "abaddriverlol"
        })
    }

    fn with_key(key: &str) -> Arguments {
        Arguments::default().with_optional(JSON_KEY_ARG, key)
    }

    #[test]
    fn test_selects_string_key_as_text() {
        let out = create_json_result(&user(), &with_key("requestedUsername"));
        assert_eq!(out, Output::Text("abaddriverlol".into()));
    }

    #[test]
    fn test_whole_document_is_compact_json() {
        let out = create_json_result(&json!({"id": 1, "name": "a"}), &Arguments::default());
        assert!(out.is_json());
        assert_eq!(out.to_string(), r#"{"id":1,"name":"a"}"#);
    }

    #[test]
    fn test_missing_and_invalid_paths_are_null() {
        for key in ["doesnotexist", "doesnotexist->->", "requestedUsername->id"] {
            assert_eq!(create_json_result(&user(), &with_key(key)).to_string(), "null");
        }
    }

    #[test]
    fn test_array_index_and_nested_keys() {
        let data = json!({"someData": ["someValue"], "nested": {"inner": "x"}});
        assert_eq!(create_json_result(&data, &with_key("someData->0")).to_string(), "someValue");
        assert_eq!(create_json_result(&data, &with_key("nested->inner")).to_string(), "x");
        assert_eq!(create_json_result(&data, &with_key("someData->1")).to_string(), "null");
    }

    #[test]
    fn test_selected_number_stays_json() {
        let out = create_json_result(&user(), &with_key("id"));
        assert_eq!(out.to_string(), "4182456156");
        assert!(out.is_json());
    }

    #[test]
    fn test_pretty() {
        let args = Arguments::default().with_optional(PRETTY_ARG, "TRUE");
        let out = create_json_result(&json!({"a": 1}), &args);
        assert_eq!(out.to_string(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_from_value_scalars() {
        let args = Arguments::default();
        assert_eq!(Output::from_value(json!("Owner"), &args), Output::Text("Owner".into()));
        assert_eq!(Output::from_value(json!(42), &args), Output::Text("42".into()));
        assert_eq!(Output::from_value(json!(true), &args), Output::Text("true".into()));
        assert!(Output::from_value(json!([1, 2]), &args).is_json());
    }
}
