//! Shapegen Definition Library
//!
//! This crate loads botocore-style service descriptions into a typed,
//! validated model. The model is consumed by `shapegen-gen`, which turns it
//! into Rust client code.
//!
//! ## Core Types
//!
//! - [`ServiceDefinition`] - Metadata plus name-ordered operation and shape tables
//! - [`Shape`] - A named schema entity
//! - [`ShapeKind`] - Primitive, structure, list or map
//! - [`PrimitiveKind`] - string, timestamp, integer, long, float, double, blob, boolean
//! - [`Member`] - A reference to another shape with wire placement
//! - [`Location`] - Header, URI, query string or payload
//! - [`Operation`] - A named call with HTTP method, URI template and shapes
//! - [`Metadata`] - Service-level settings such as the endpoint prefix
//!
//! ## Loading Invariants
//!
//! [`ServiceDefinition::from_json`] fails with a [`SchemaError`] when a shape
//! reference does not resolve, a required or payload member is undeclared,
//! a member name repeats, or a shape kind is outside the closed set.

pub mod error;
mod metadata;
mod operation;
pub mod ordered;
mod service;
mod shape;

pub use error::SchemaError;
pub use metadata::Metadata;
pub use operation::{HttpMethod, Operation};
pub use service::ServiceDefinition;
pub use shape::{
    ListShape, Location, MapShape, Member, PrimitiveKind, Shape, ShapeKind, StructureShape,
};
