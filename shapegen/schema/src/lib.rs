//! Clients generated from the service descriptions under `services/`.
//!
//! `build.rs` runs `shapegen-gen` over each description and this crate
//! includes the result, so the generated code is compiled and tested
//! like any hand-written module.
//!
//! - [`widgets`] - a REST-XML service
//! - [`gadgets`] - a JSON service

#![allow(clippy::all)]

pub mod widgets {
    include!(concat!(env!("OUT_DIR"), "/widgets.rs"));
}

pub mod gadgets {
    include!(concat!(env!("OUT_DIR"), "/gadgets.rs"));
}
