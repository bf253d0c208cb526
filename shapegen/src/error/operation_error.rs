//! Top-level operation error type.

use thiserror::Error;

use super::{DispatchError, ParseError};

/// Error returned by every generated operation method.
///
/// ## Examples
///
/// ```rust,ignore
/// match client.describe_widget().await {
///     Ok(widget) => println!("{widget:?}"),
///     Err(OperationError::Service { status: 404, .. }) => println!("no widget"),
///     Err(other) => eprintln!("{other}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum OperationError {
    /// The request could not be sent or no response arrived.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// A success response did not match the output shape.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The service answered with a non-success status.
    #[error("{operation} failed with HTTP {status}: {body}")]
    Service {
        operation: String,
        status: u16,
        body: String,
    },
}

impl OperationError {
    /// Creates a [`OperationError::Service`] from the raw response body.
    pub fn service(operation: &str, status: u16, body: &[u8]) -> Self {
        Self::Service {
            operation: operation.to_string(),
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    /// Returns the HTTP status code for service errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            Self::Dispatch(DispatchError::Http(e)) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
