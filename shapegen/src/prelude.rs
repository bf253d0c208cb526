//! Everything generated client code refers to.
//!
//! Generated modules start with `use shapegen::prelude::*;`.

pub use std::collections::BTreeMap;

pub use reqwest::header::HeaderMap;

pub use crate::dispatch::{DispatchRequest, HttpResponse, ReqwestDispatcher};
pub use crate::error::{DispatchError, OperationError, ParseError};
pub use crate::json::{JsonValue, expect_array, expect_object, parse_json};
pub use crate::params::Params;
pub use crate::request::ServiceRequest;
pub use crate::scalar::{Merge, Scalar, header_value, join_path, merge_into};
pub use crate::xml::XmlReader;
