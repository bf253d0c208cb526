//! Error types for the shapegen generator.

use shapegen_define::SchemaError;
use thiserror::Error;

/// Errors that can occur during code generation.
///
/// Every variant aborts the run before any output is written and names the
/// shape, member or operation at fault.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The service description could not be loaded.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Failed to generate code
    #[error("Code generation failed: {0}")]
    CodeGenError(String),

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// The protocol has no codec strategy.
    #[error("Unsupported protocol '{0}'. Supported protocols are: rest-xml, json")]
    UnsupportedProtocol(String),

    /// A schema name cannot be turned into a Rust identifier.
    #[error("'{name}' cannot be used as a Rust identifier: {reason}")]
    InvalidIdentifier { name: String, reason: String },

    /// Two shapes map to the same Rust type name.
    #[error("Shapes '{first}' and '{second}' both generate the type '{rust_name}'")]
    NameCollision {
        first: String,
        second: String,
        rust_name: String,
    },

    /// Two members of one structure map to the same field name.
    #[error(
        "Members '{first}' and '{second}' of shape '{shape}' both generate the field '{field}'"
    )]
    FieldCollision {
        shape: String,
        first: String,
        second: String,
        field: String,
    },

    /// Two body members of one structure share a wire-name.
    #[error("Members '{first}' and '{second}' of shape '{shape}' share the wire-name '{wire_name}'")]
    WireNameCollision {
        shape: String,
        first: String,
        second: String,
        wire_name: String,
    },

    /// Two operations map to the same method name.
    #[error("Operations '{first}' and '{second}' both generate the method '{method}'")]
    MethodCollision {
        first: String,
        second: String,
        method: String,
    },

    /// A header, uri or querystring member does not reference a primitive.
    #[error(
        "Member '{member}' of shape '{shape}' is placed in the {location} but references non-primitive shape '{target}'"
    )]
    UnsupportedLocation {
        shape: String,
        member: String,
        location: String,
        target: String,
    },

    /// A map key cannot be ordered.
    #[error("Map '{shape}' has key shape '{key}' which is not a string, integer, long, boolean, timestamp or blob")]
    InvalidMapKey { shape: String, key: String },

    /// A structure contains itself without a list or map in between.
    #[error("Shape '{shape}' contains itself without an intervening list or map: {path}")]
    RecursiveShape { shape: String, path: String },

    /// A shape that gets an encoder or decoder references one that does not.
    #[error("Shape '{shape}' needs a {codec} for '{referenced}', which is not generated for it")]
    MissingCodec {
        shape: String,
        referenced: String,
        codec: &'static str,
    },
}
