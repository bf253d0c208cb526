//! Generator configuration.
//!
//! A [`GeneratorConfig`] is built once (from CLI flags or by a build script)
//! and passed by reference through every generation stage.

use std::collections::BTreeSet;

use crate::errors::GeneratorError;

/// Shape names that would shadow a std-prelude or runtime-prelude name in
/// generated code, and so get the service identifier as a prefix.
pub const DEFAULT_RESERVED_NAMES: &[&str] = &[
    "Message",
    "Error",
    // std prelude
    "Result",
    "Option",
    "Some",
    "None",
    "Ok",
    "Err",
    "Vec",
    "Box",
    "Default",
    "Clone",
    "Debug",
    "PartialEq",
    "Send",
    "Sync",
    "Sized",
    "Iterator",
    "ToString",
    "From",
    "Into",
    "Self",
    // runtime prelude
    "BTreeMap",
    "DispatchError",
    "DispatchRequest",
    "HeaderMap",
    "HttpResponse",
    "JsonValue",
    "Merge",
    "OperationError",
    "Params",
    "ParseError",
    "ReqwestDispatcher",
    "Scalar",
    "ServiceRequest",
    "XmlReader",
];

/// Default marker prepended to identifiers that are Rust keywords.
pub const DEFAULT_FIELD_PREFIX: &str = "field_";

/// Settings shared by every generation stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Shape names that must be prefixed with the service identifier.
    pub reserved_names: BTreeSet<String>,
    /// Marker for keyword and digit-leading identifiers.
    pub field_prefix: String,
    /// Shapes whose name ends with this get no decoder.
    pub request_suffix: String,
    /// Shapes whose name ends with one of these get no encoder.
    pub response_suffixes: Vec<String>,
    /// Overrides the service identifier derived from the metadata.
    pub service_name: Option<String>,
    /// Overrides the protocol named in the metadata.
    pub protocol: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            reserved_names: DEFAULT_RESERVED_NAMES.iter().map(|s| s.to_string()).collect(),
            field_prefix: DEFAULT_FIELD_PREFIX.to_string(),
            request_suffix: "Request".to_string(),
            response_suffixes: vec!["Output".to_string(), "Result".to_string()],
            service_name: None,
            protocol: None,
        }
    }
}

impl GeneratorConfig {
    /// Adds names to the reserved set.
    pub fn with_reserved<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_field_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.field_prefix = prefix.into();
        self
    }

    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    /// Whether shapes named `name` get no decoder.
    pub fn is_request_only(&self, name: &str) -> bool {
        !self.request_suffix.is_empty() && name.ends_with(&self.request_suffix)
    }

    /// Whether shapes named `name` get no encoder.
    pub fn is_response_only(&self, name: &str) -> bool {
        self.response_suffixes
            .iter()
            .any(|suffix| !suffix.is_empty() && name.ends_with(suffix.as_str()))
    }

    /// Checks that the configuration can produce valid identifiers.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::ConfigError` if the field prefix is empty or
    /// would not start an identifier, or if a suffix is not alphanumeric.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        let prefix_ok = self
            .field_prefix
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && self
                .field_prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !prefix_ok {
            return Err(GeneratorError::ConfigError(format!(
                "field prefix '{}' must start with a letter or underscore and contain only letters, digits and underscores",
                self.field_prefix
            )));
        }

        for suffix in std::iter::once(&self.request_suffix).chain(&self.response_suffixes) {
            if !suffix.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(GeneratorError::ConfigError(format!(
                    "shape suffix '{suffix}' must contain only letters and digits"
                )));
            }
        }

        Ok(())
    }
}
