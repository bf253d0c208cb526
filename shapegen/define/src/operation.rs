//! Operation definitions.

use std::str::FromStr;

use serde::Deserialize;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::SchemaError;

/// HTTP methods an operation may use.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use shapegen_define::HttpMethod;
///
/// assert_eq!(HttpMethod::from_str("POST").unwrap(), HttpMethod::Post);
/// assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    /// The method as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// A named service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Name taken from the operation table key.
    pub name: String,
    pub method: HttpMethod,
    /// Path template, possibly containing `{Name}` or `{Name+}` placeholders.
    pub request_uri: String,
    /// Input shape name, if the operation takes one.
    pub input: Option<String>,
    /// Output shape name, if the operation returns one.
    pub output: Option<String>,
    pub documentation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHttp {
    #[serde(default = "default_method")]
    method: String,
    #[serde(default = "default_request_uri")]
    request_uri: String,
}

fn default_method() -> String {
    "POST".to_string()
}

fn default_request_uri() -> String {
    "/".to_string()
}

impl Default for RawHttp {
    fn default() -> Self {
        Self {
            method: default_method(),
            request_uri: default_request_uri(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawShapeRef {
    shape: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawOperation {
    #[serde(default)]
    http: RawHttp,
    #[serde(default)]
    input: Option<RawShapeRef>,
    #[serde(default)]
    output: Option<RawShapeRef>,
    #[serde(default)]
    documentation: Option<String>,
}

impl RawOperation {
    pub(crate) fn into_operation(self, name: &str) -> Result<Operation, SchemaError> {
        let method = HttpMethod::from_str(&self.http.method.to_ascii_uppercase()).map_err(|_| {
            SchemaError::UnknownHttpMethod {
                operation: name.to_string(),
                method: self.http.method.clone(),
            }
        })?;

        Ok(Operation {
            name: name.to_string(),
            method,
            request_uri: self.http.request_uri,
            input: self.input.map(|r| r.shape),
            output: self.output.map(|r| r.shape),
            documentation: self.documentation,
        })
    }
}
