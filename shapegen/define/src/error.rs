//! Errors raised while loading a service description.

use thiserror::Error;

/// A malformed service description.
///
/// Every variant names the shape, member or operation at fault so the
/// author of the document can find it. All of these abort generation.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The document is not valid JSON or does not have the expected layout.
    #[error("Failed to parse service description: {0}")]
    Json(#[from] serde_json::Error),

    /// The document could not be read from disk.
    #[error("Failed to read service description '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A shape declares a `type` outside the closed vocabulary.
    #[error(
        "Shape '{shape}' has unrecognised type '{kind}'. Supported types are: string, timestamp, integer, long, float, double, blob, boolean, structure, list, map"
    )]
    UnknownShapeKind { shape: String, kind: String },

    /// A list or map shape is missing one of the references its kind requires.
    #[error("Shape '{shape}' of type {kind} is missing its '{field}' definition")]
    MissingShapeField {
        shape: String,
        kind: &'static str,
        field: &'static str,
    },

    /// A shape reference points at a name that is not in the shape table.
    #[error("'{owner}' references shape '{reference}' which is not defined")]
    DanglingReference { owner: String, reference: String },

    /// A structure lists a required member it does not declare.
    #[error("Shape '{shape}' marks '{member}' as required but has no such member")]
    UnknownRequiredMember { shape: String, member: String },

    /// A structure's `payload` attribute names a member it does not declare.
    #[error("Shape '{shape}' uses '{member}' as its payload but has no such member")]
    UnknownPayloadMember { shape: String, member: String },

    /// A member declares the same name twice.
    #[error("Shape '{shape}' declares member '{member}' more than once")]
    DuplicateMember { shape: String, member: String },

    /// A member uses a `location` this generator cannot place.
    #[error(
        "Member '{member}' of shape '{shape}' has unsupported location '{location}' (expected header, uri, querystring or payload)"
    )]
    UnknownLocation {
        shape: String,
        member: String,
        location: String,
    },

    /// An operation uses an HTTP method outside the supported set.
    #[error("Operation '{operation}' uses unsupported HTTP method '{method}'")]
    UnknownHttpMethod { operation: String, method: String },
}

impl SchemaError {
    /// Returns `true` when the error points at a reference problem rather
    /// than at the document's syntax.
    pub fn is_reference_error(&self) -> bool {
        matches!(
            self,
            Self::DanglingReference { .. }
                | Self::UnknownRequiredMember { .. }
                | Self::UnknownPayloadMember { .. }
        )
    }
}
