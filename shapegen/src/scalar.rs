//! Scalar wire conversions and small helpers shared by generated codecs.

use std::collections::BTreeMap;
use std::fmt::Display;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::HeaderMap;

use crate::error::ParseError;
use crate::json::{JsonValue, type_name};

/// A primitive value with a textual wire form.
///
/// Numbers and booleans use their canonical decimal text, blobs use
/// base64. JSON decoding accepts the native JSON type and, for numbers and
/// booleans, the same text carried in a string.
pub trait Scalar: Sized {
    /// Parses element or header text. `field` names the value in errors.
    fn from_wire(field: &str, text: &str) -> Result<Self, ParseError>;

    /// Converts a JSON value. `field` names the value in errors.
    fn from_json(field: &str, value: &JsonValue) -> Result<Self, ParseError>;

    /// Renders the value as parameter or header text.
    fn to_wire(&self) -> String;
}

fn unexpected(field: &str, expected: &'static str, value: &JsonValue) -> ParseError {
    ParseError::UnexpectedType {
        field: field.to_string(),
        expected,
        found: type_name(value),
    }
}

impl Scalar for String {
    fn from_wire(_field: &str, text: &str) -> Result<Self, ParseError> {
        Ok(text.to_string())
    }

    fn from_json(field: &str, value: &JsonValue) -> Result<Self, ParseError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| unexpected(field, "a string", value))
    }

    fn to_wire(&self) -> String {
        self.clone()
    }
}

macro_rules! integer_scalar {
    ($ty:ty, $label:literal) => {
        impl Scalar for $ty {
            fn from_wire(field: &str, text: &str) -> Result<Self, ParseError> {
                text.trim()
                    .parse()
                    .map_err(|_| ParseError::invalid_value(field, text, $label))
            }

            fn from_json(field: &str, value: &JsonValue) -> Result<Self, ParseError> {
                match value {
                    JsonValue::Number(number) => number
                        .as_i64()
                        .and_then(|n| <$ty>::try_from(n).ok())
                        .ok_or_else(|| ParseError::invalid_value(field, &number.to_string(), $label)),
                    JsonValue::String(text) => Self::from_wire(field, text),
                    other => Err(unexpected(field, "a number", other)),
                }
            }

            fn to_wire(&self) -> String {
                self.to_string()
            }
        }
    };
}

macro_rules! float_scalar {
    ($ty:ty, $label:literal) => {
        impl Scalar for $ty {
            fn from_wire(field: &str, text: &str) -> Result<Self, ParseError> {
                text.trim()
                    .parse()
                    .map_err(|_| ParseError::invalid_value(field, text, $label))
            }

            fn from_json(field: &str, value: &JsonValue) -> Result<Self, ParseError> {
                match value {
                    JsonValue::Number(number) => number
                        .as_f64()
                        .map(|n| n as $ty)
                        .ok_or_else(|| ParseError::invalid_value(field, &number.to_string(), $label)),
                    JsonValue::String(text) => Self::from_wire(field, text),
                    other => Err(unexpected(field, "a number", other)),
                }
            }

            fn to_wire(&self) -> String {
                self.to_string()
            }
        }
    };
}

integer_scalar!(i32, "integer");
integer_scalar!(i64, "long");
float_scalar!(f32, "float");
float_scalar!(f64, "double");

impl Scalar for bool {
    fn from_wire(field: &str, text: &str) -> Result<Self, ParseError> {
        match text.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ParseError::invalid_value(field, text, "boolean")),
        }
    }

    fn from_json(field: &str, value: &JsonValue) -> Result<Self, ParseError> {
        match value {
            JsonValue::Bool(flag) => Ok(*flag),
            JsonValue::String(text) => Self::from_wire(field, text),
            other => Err(unexpected(field, "a boolean", other)),
        }
    }

    fn to_wire(&self) -> String {
        self.to_string()
    }
}

impl Scalar for Vec<u8> {
    fn from_wire(field: &str, text: &str) -> Result<Self, ParseError> {
        STANDARD
            .decode(text.trim())
            .map_err(|_| ParseError::invalid_value(field, text, "base64 blob"))
    }

    fn from_json(field: &str, value: &JsonValue) -> Result<Self, ParseError> {
        match value {
            JsonValue::String(text) => Self::from_wire(field, text),
            other => Err(unexpected(field, "a base64 string", other)),
        }
    }

    fn to_wire(&self) -> String {
        STANDARD.encode(self)
    }
}

/// Text of a response header, if present and valid UTF-8.
pub fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Appends `segment` to a dotted parameter path.
///
/// ## Examples
///
/// ```
/// use shapegen::join_path;
///
/// assert_eq!(join_path("", "Id"), "Id");
/// assert_eq!(join_path("Tags", 2), "Tags.2");
/// ```
pub fn join_path(name: &str, segment: impl Display) -> String {
    if name.is_empty() {
        segment.to_string()
    } else {
        format!("{name}.{segment}")
    }
}

/// Collections a decoder may see more than once for the same member.
pub trait Merge {
    /// Folds `other` into `self`.
    fn merge(&mut self, other: Self);
}

impl<T> Merge for Vec<T> {
    fn merge(&mut self, other: Self) {
        self.extend(other);
    }
}

/// The first value seen for a key wins.
impl<K: Ord, V> Merge for BTreeMap<K, V> {
    fn merge(&mut self, other: Self) {
        for (key, value) in other {
            self.entry(key).or_insert(value);
        }
    }
}

/// Stores `value` in an empty slot or merges it into the existing one.
pub fn merge_into<T: Merge>(slot: &mut Option<T>, value: T) {
    match slot {
        Some(existing) => existing.merge(value),
        None => *slot = Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use serde_json::json;

    #[test]
    fn integers_round_trip_through_text() {
        assert_eq!(i32::from_wire("Count", " 42 ").unwrap(), 42);
        assert_eq!((-7i64).to_wire(), "-7");
        assert!(i32::from_wire("Count", "4.5").is_err());
    }

    #[test]
    fn integer_overflow_is_invalid() {
        let err = i32::from_json("Count", &json!(3_000_000_000i64)).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { .. }));
    }

    #[test]
    fn numbers_accept_numeric_strings_in_json() {
        assert_eq!(i64::from_json("Size", &json!("12")).unwrap(), 12);
        assert_eq!(f64::from_json("Ratio", &json!(0.5)).unwrap(), 0.5);
        assert!(i32::from_json("Count", &json!(true)).is_err());
    }

    #[test]
    fn booleans_are_strict() {
        assert!(bool::from_wire("Enabled", "true").unwrap());
        assert!(!bool::from_json("Enabled", &json!(false)).unwrap());
        assert!(bool::from_wire("Enabled", "yes").is_err());
    }

    #[test]
    fn blobs_use_base64() {
        let blob = b"\x00\xffwidget".to_vec();
        let text = blob.to_wire();
        assert_eq!(Vec::<u8>::from_wire("Body", &text).unwrap(), blob);
        assert!(Vec::<u8>::from_wire("Body", "not base64!").is_err());
    }

    #[test]
    fn strings_reject_other_json_types() {
        let err = String::from_json("Name", &json!(5)).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedType {
                field: "Name".to_string(),
                expected: "a string",
                found: "a number",
            }
        );
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("etag", HeaderValue::from_static("\"abc\""));
        assert_eq!(header_value(&headers, "ETag"), Some("\"abc\""));
        assert_eq!(header_value(&headers, "x-missing"), None);
    }

    #[test]
    fn merge_appends_lists_and_keeps_first_map_value() {
        let mut tags = Some(vec!["a".to_string()]);
        merge_into(&mut tags, vec!["b".to_string()]);
        assert_eq!(tags, Some(vec!["a".to_string(), "b".to_string()]));

        let mut attributes: Option<BTreeMap<String, String>> = None;
        merge_into(&mut attributes, BTreeMap::from([("k".to_string(), "first".to_string())]));
        merge_into(&mut attributes, BTreeMap::from([("k".to_string(), "second".to_string())]));
        assert_eq!(attributes.unwrap()["k"], "first");
    }
}
