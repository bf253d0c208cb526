//! Runtime support for generated service clients.
//!
//! `shapegen-gen` emits type declarations, encoders, decoders and a client
//! struct per service. That code only ever calls into this crate:
//!
//! - [`ServiceRequest`] and [`Params`] - the outbound request encoders fill in
//! - [`DispatchRequest`] - the transport seam, with [`ReqwestDispatcher`] as
//!   the HTTP implementation
//! - [`HttpResponse`] - status, headers and raw body
//! - [`XmlReader`] and the JSON helpers - inputs for generated decoders
//! - [`Scalar`] - text and JSON conversions for primitive values
//! - [`OperationError`], [`ParseError`], [`DispatchError`]
//!
//! Requests are sent unsigned; signing and credentials belong to whatever
//! dispatcher the caller supplies.

pub mod dispatch;
pub mod error;
pub mod json;
pub mod params;
pub mod prelude;
pub mod request;
pub mod scalar;
pub mod xml;

pub use dispatch::{DispatchRequest, HttpResponse, ReqwestDispatcher};
pub use error::{DispatchError, OperationError, ParseError};
pub use json::{JsonValue, expect_array, expect_object, parse_json};
pub use params::Params;
pub use request::ServiceRequest;
pub use scalar::{Merge, Scalar, header_value, join_path, merge_into};
pub use xml::XmlReader;
