//! Error types for generated clients.
//!
//! - [`ParseError`] - a response body or header could not be decoded
//! - [`DispatchError`] - the request never produced a response
//! - [`OperationError`] - what a generated operation method returns

mod dispatch_error;
mod operation_error;
mod parse_error;

pub use dispatch_error::DispatchError;
pub use operation_error::OperationError;
pub use parse_error::ParseError;
