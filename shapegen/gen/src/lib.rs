//! Shapegen code generator library.
//!
//! This crate compiles a service description loaded with `shapegen-define`
//! into a Rust module built on the `shapegen` runtime. For every shape the
//! generated module contains:
//!
//! - A declaration (`pub struct` for structures, `pub type` otherwise)
//! - A `<Name>Encoder` that flattens values into a `ServiceRequest`
//! - A `<Name>Decoder` for the service's wire protocol (REST-XML or JSON)
//!
//! followed by a `<Service>Client<D>` with one async method per operation.
//!
//! ## Modules
//!
//! - [`config`] - Generator settings (reserved names, field prefix, overrides)
//! - [`naming`] - Schema names to Rust identifiers
//! - [`types`] - Shapes to Rust types
//! - [`codec`] - Protocol strategies: decoders and per-operation glue
//! - [`codegen`] - Declarations, encoders and the client
//! - [`validation`] - Checks run before anything is generated
//! - [`output`] - Final assembly, validation, formatting and file writing
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use shapegen_define::ServiceDefinition;
//! use shapegen_gen::config::GeneratorConfig;
//! use shapegen_gen::output::generate_and_write;
//!
//! let service = ServiceDefinition::from_path(Path::new("services/widgets.json")).unwrap();
//! let config = GeneratorConfig::default();
//!
//! // Write the module; pass `true` for dry_run to print it instead.
//! generate_and_write(&service, &config, Some(Path::new("src/widgets.rs")), false).unwrap();
//! ```
//!
//! ## Build Scripts
//!
//! [`output::generate_code`] returns the module as a string, which a build
//! script can write into `OUT_DIR` and the crate can `include!`.

pub mod codec;
pub mod codegen;
pub mod config;
pub mod docs;
pub mod errors;
pub mod naming;
pub mod output;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_utils;
