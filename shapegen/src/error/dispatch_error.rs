//! Transport errors.

use thiserror::Error;

/// Errors from the transport layer.
///
/// These represent failures to obtain any HTTP response at all. A response
/// with an error status is not a `DispatchError`.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// HTTP request failed due to network or protocol error.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The request carries a method the HTTP stack rejects.
    #[error("Invalid HTTP method '{0}'")]
    InvalidMethod(String),

    /// Any other transport failure, for dispatchers not backed by reqwest.
    #[error("Transport failed: {0}")]
    Transport(String),
}

impl DispatchError {
    /// Returns `true` if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::InvalidMethod(_) => false,
            Self::Transport(_) => true,
        }
    }
}
