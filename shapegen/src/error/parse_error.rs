//! Response decoding errors.

use thiserror::Error;

/// A response could not be decoded into the expected shape.
///
/// Every variant carries enough context (tag or field name, offending text)
/// to locate the problem in the response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The next element is not the one the decoder expected.
    #[error("Expected element <{expected}>, found {found}")]
    UnexpectedElement { expected: String, found: String },

    /// The input ended before an element was closed.
    #[error("Element <{0}> is not closed before the end of the document")]
    UnclosedElement(String),

    /// A required member is absent.
    #[error("Missing required field '{field}' in '{parent}'")]
    MissingField { parent: String, field: String },

    /// Text could not be converted to the member's type.
    #[error("Invalid value for '{field}': '{value}' is not a valid {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: &'static str,
    },

    /// A JSON value has the wrong type.
    #[error("Field '{field}' should be {expected} but is {found}")]
    UnexpectedType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The body is not well-formed XML.
    #[error("Malformed XML: {0}")]
    Xml(String),

    /// The body is not well-formed JSON.
    #[error("Malformed JSON: {0}")]
    Json(String),
}

impl ParseError {
    /// Creates a [`ParseError::MissingField`].
    pub fn missing_field(parent: &str, field: &str) -> Self {
        Self::MissingField {
            parent: parent.to_string(),
            field: field.to_string(),
        }
    }

    /// Creates a [`ParseError::InvalidValue`].
    pub fn invalid_value(field: &str, value: &str, expected: &'static str) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            expected,
        }
    }
}

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
