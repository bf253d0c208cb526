//! JSON helpers for generated decoders.
//!
//! Bodies are read through a visitor rather than straight into
//! `serde_json::Value`, whose object map keeps the last of a repeated key.
//! Decoded maps keep the first entry for a key, on both protocols.

use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
pub use serde_json::Value as JsonValue;
use serde_json::Map;

use crate::error::ParseError;

/// Parses a response body. An empty or blank body is an empty object.
///
/// When an object repeats a key, the first value is kept.
///
/// ## Examples
///
/// ```
/// use shapegen::parse_json;
///
/// assert!(parse_json(b"").unwrap().as_object().unwrap().is_empty());
/// assert_eq!(parse_json(br#"{"Id": "g-1"}"#).unwrap()["Id"], "g-1");
/// ```
pub fn parse_json(body: &[u8]) -> Result<JsonValue, ParseError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(JsonValue::Object(Map::new()));
    }
    let FirstWins(value) = serde_json::from_slice(body)?;
    Ok(value)
}

/// A JSON value whose objects keep the first value of a repeated key.
struct FirstWins(JsonValue);

impl<'de> Deserialize<'de> for FirstWins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FirstWinsVisitor).map(FirstWins)
    }
}

struct FirstWinsVisitor;

impl<'de> Visitor<'de> for FirstWinsVisitor {
    type Value = JsonValue;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any JSON value")
    }

    fn visit_bool<E>(self, value: bool) -> Result<JsonValue, E> {
        Ok(JsonValue::Bool(value))
    }

    fn visit_i64<E>(self, value: i64) -> Result<JsonValue, E> {
        Ok(JsonValue::from(value))
    }

    fn visit_u64<E>(self, value: u64) -> Result<JsonValue, E> {
        Ok(JsonValue::from(value))
    }

    fn visit_f64<E>(self, value: f64) -> Result<JsonValue, E> {
        Ok(JsonValue::from(value))
    }

    fn visit_str<E>(self, value: &str) -> Result<JsonValue, E> {
        Ok(JsonValue::String(value.to_string()))
    }

    fn visit_string<E>(self, value: String) -> Result<JsonValue, E> {
        Ok(JsonValue::String(value))
    }

    fn visit_unit<E>(self) -> Result<JsonValue, E> {
        Ok(JsonValue::Null)
    }

    fn visit_none<E>(self) -> Result<JsonValue, E> {
        Ok(JsonValue::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<JsonValue, D::Error>
    where
        D: Deserializer<'de>,
    {
        FirstWins::deserialize(deserializer).map(|FirstWins(value)| value)
    }

    fn visit_seq<A>(self, mut access: A) -> Result<JsonValue, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(FirstWins(item)) = access.next_element()? {
            items.push(item);
        }
        Ok(JsonValue::Array(items))
    }

    fn visit_map<A>(self, mut access: A) -> Result<JsonValue, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = Map::new();
        while let Some(key) = access.next_key::<String>()? {
            let FirstWins(value) = access.next_value()?;
            map.entry(key).or_insert(value);
        }
        Ok(JsonValue::Object(map))
    }
}

/// Borrows `value` as an object or reports the field's actual type.
pub fn expect_object<'a>(
    field: &str,
    value: &'a JsonValue,
) -> Result<&'a Map<String, JsonValue>, ParseError> {
    value.as_object().ok_or_else(|| ParseError::UnexpectedType {
        field: field.to_string(),
        expected: "an object",
        found: type_name(value),
    })
}

/// Borrows `value` as an array or reports the field's actual type.
pub fn expect_array<'a>(field: &str, value: &'a JsonValue) -> Result<&'a [JsonValue], ParseError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| ParseError::UnexpectedType {
            field: field.to_string(),
            expected: "an array",
            found: type_name(value),
        })
}

/// Describes the JSON type of `value` for error messages.
pub fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
