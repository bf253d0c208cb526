//! Code generation modules for shapegen.
//!
//! This module contains generators that produce Rust source code from a
//! loaded [`ServiceDefinition`]. Each submodule handles one kind of
//! generated item.
//!
//! ## Submodules
//!
//! - [`declarations`] - `pub struct` and `pub type` declarations per shape
//! - [`encoder`] - `<Name>Encoder` request-parameter writers
//! - [`operations`] - the `<Service>Client` struct and its operation methods
//!
//! Decoders are protocol-specific and live in [`crate::codec`].
//!
//! ## Output Format
//!
//! All generators return `proc_macro2::TokenStream`, which is then:
//! - Validated with `syn::parse2` to ensure correctness
//! - Formatted with `prettyplease` for consistent style
//!
//! See [`crate::output`] for the assembly and file writing logic.

pub mod declarations;
pub mod encoder;
pub mod operations;

use std::str::FromStr;

use proc_macro2::{Ident, TokenStream};
use quote::format_ident;
use shapegen_define::{
    Location, MapShape, Member, ServiceDefinition, Shape, ShapeKind, StructureShape,
};

use crate::codec::{Protocol, ProtocolKind};
use crate::config::GeneratorConfig;
use crate::errors::GeneratorError;
use crate::naming::NameResolver;
use crate::types::TypeMapper;

pub use declarations::generate_declaration;
pub use encoder::generate_encoder;
pub use operations::generate_client;

/// Everything a generator needs: the immutable model, the configuration,
/// resolved names and the protocol strategy.
pub struct GenContext<'a> {
    pub service: &'a ServiceDefinition,
    pub config: &'a GeneratorConfig,
    pub names: NameResolver<'a>,
    pub protocol: &'static dyn Protocol,
}

impl<'a> GenContext<'a> {
    /// Resolves the protocol and service identifier.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::UnsupportedProtocol` when neither the
    /// configuration nor the metadata names a supported protocol.
    pub fn new(
        service: &'a ServiceDefinition,
        config: &'a GeneratorConfig,
    ) -> Result<Self, GeneratorError> {
        config.validate()?;

        let protocol_name = config
            .protocol
            .as_deref()
            .or(service.protocol())
            .ok_or_else(|| GeneratorError::UnsupportedProtocol("(none)".to_string()))?;
        let kind = ProtocolKind::from_str(protocol_name)
            .map_err(|_| GeneratorError::UnsupportedProtocol(protocol_name.to_string()))?;

        Ok(Self {
            service,
            config,
            names: NameResolver::new(service, config)?,
            protocol: kind.strategy(),
        })
    }

    pub fn types(&self) -> TypeMapper<'_> {
        TypeMapper::new(&self.names)
    }

    /// Looks up a shape that loading has already proven to exist.
    pub fn shape(&self, name: &str) -> Result<&'a Shape, GeneratorError> {
        self.service
            .shape(name)
            .ok_or_else(|| GeneratorError::CodeGenError(format!("shape '{name}' is not defined")))
    }

    /// Whether the shape called `name` gets an encoder.
    pub fn has_encoder(&self, name: &str) -> bool {
        !self.config.is_response_only(name)
    }

    /// Whether the shape called `name` gets a decoder.
    pub fn has_decoder(&self, name: &str) -> bool {
        !self.config.is_request_only(name)
    }

    pub fn encoder_ident(&self, shape_name: &str) -> Result<Ident, GeneratorError> {
        Ok(format_ident!("{}", self.names.encoder_name(shape_name)?))
    }

    pub fn decoder_ident(&self, shape_name: &str) -> Result<Ident, GeneratorError> {
        Ok(format_ident!("{}", self.names.decoder_name(shape_name)?))
    }

    /// The name a member is written and read under.
    ///
    /// The member's `locationName` wins. A list member without one takes
    /// its element's wire-name, since lists carry no wrapper of their own.
    pub fn wire_name(&self, member_name: &str, member: &Member) -> Result<String, GeneratorError> {
        if let Some(name) = &member.location_name {
            return Ok(name.clone());
        }
        match self.shape(&member.shape)?.as_list() {
            Some(list) => Ok(element_wire_name(&list.member)),
            None => Ok(member_name.to_string()),
        }
    }

    /// Per-member facts for generating a structure's encoder or decoder.
    pub fn member_plans(
        &self,
        structure: &'a StructureShape,
    ) -> Result<Vec<MemberPlan<'a>>, GeneratorError> {
        structure
            .members
            .iter()
            .map(|(name, member)| {
                let field = self.names.field_name(name)?;
                Ok(MemberPlan {
                    name: name.as_str(),
                    member,
                    target: self.shape(&member.shape)?,
                    slot: format_ident!("slot_{}", field),
                    field: format_ident!("{}", field),
                    wire: self.wire_name(name, member)?,
                    ty: self.types().reference(&member.shape)?,
                    required: structure.is_required(name),
                })
            })
            .collect()
    }
}

/// The wire-name of a list element: its `locationName`, else its shape name.
pub fn element_wire_name(element: &Member) -> String {
    element
        .location_name
        .clone()
        .unwrap_or_else(|| element.shape.clone())
}

/// Names of the key and value inside one map entry, shared by the encoder
/// and the XML decoder. Defaults are `key` and `value`.
pub fn map_entry_wire_names(map: &MapShape) -> (&str, &str) {
    (
        map.key.location_name.as_deref().unwrap_or("key"),
        map.value.location_name.as_deref().unwrap_or("value"),
    )
}

/// One structure member with everything resolved.
pub struct MemberPlan<'s> {
    /// Schema member name.
    pub name: &'s str,
    pub member: &'s Member,
    /// The shape the member references.
    pub target: &'s Shape,
    pub field: Ident,
    /// Decoder-local variable holding the member while the body is scanned.
    pub slot: Ident,
    pub wire: String,
    /// Referenced type, not wrapped in `Option`.
    pub ty: TokenStream,
    pub required: bool,
}

impl MemberPlan<'_> {
    pub fn is_header(&self) -> bool {
        self.member.location == Location::Header
    }

    /// Lists and maps, which decode to empty when required but absent.
    pub fn is_collection(&self) -> bool {
        matches!(self.target.kind, ShapeKind::List(_) | ShapeKind::Map(_))
    }

    /// A list member whose own wire-name differs from its elements', so the
    /// elements sit inside a wrapper element.
    pub fn is_wrapped_list(&self) -> bool {
        match self.target.as_list() {
            Some(list) => {
                self.member.location_name.is_some() && element_wire_name(&list.member) != self.wire
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::load_service;

    const SERVICE: &str = r#"{
        "metadata": {"endpointPrefix": "widgets", "protocol": "rest-xml"},
        "shapes": {
            "String": {"type": "string"},
            "TagList": {"type": "list", "member": {"shape": "String", "locationName": "Tag"}},
            "Names": {"type": "list", "member": {"shape": "String"}},
            "Widget": {
                "type": "structure",
                "required": ["Tags"],
                "members": {
                    "Tags": {"shape": "TagList"},
                    "TagSet": {"shape": "TagList", "locationName": "TagSet"},
                    "Names": {"shape": "Names"},
                    "Id": {"shape": "String", "locationName": "id"},
                    "Type": {"shape": "String"},
                    "Token": {"shape": "String", "location": "header", "locationName": "x-token"}
                }
            },
            "WidgetRequest": {"type": "structure", "members": {}},
            "WidgetOutput": {"type": "structure", "members": {}}
        }
    }"#;

    #[test]
    fn protocol_comes_from_metadata_or_override() {
        let service = load_service(SERVICE);
        let config = GeneratorConfig::default();
        let ctx = GenContext::new(&service, &config).unwrap();
        assert_eq!(ctx.protocol.kind(), ProtocolKind::RestXml);

        let config = GeneratorConfig::default().with_protocol("json");
        let ctx = GenContext::new(&service, &config).unwrap();
        assert_eq!(ctx.protocol.kind(), ProtocolKind::Json);
    }

    #[test]
    fn unknown_protocol_is_rejected() {
        let service = load_service(SERVICE);
        let config = GeneratorConfig::default().with_protocol("ec2");
        let err = GenContext::new(&service, &config).err().unwrap();
        assert!(matches!(err, GeneratorError::UnsupportedProtocol(ref name) if name == "ec2"));
    }

    #[test]
    fn wire_names_follow_location_name_then_list_element() {
        let service = load_service(SERVICE);
        let config = GeneratorConfig::default();
        let ctx = GenContext::new(&service, &config).unwrap();
        let widget = service.shape("Widget").unwrap().as_structure().unwrap();
        let plans = ctx.member_plans(widget).unwrap();

        let wires: Vec<&str> = plans.iter().map(|p| p.wire.as_str()).collect();
        assert_eq!(wires, vec!["Tag", "TagSet", "String", "id", "Type", "x-token"]);

        assert!(!plans[0].is_wrapped_list());
        assert!(plans[1].is_wrapped_list());
        assert!(plans[0].required && plans[0].is_collection());
        assert_eq!(plans[4].field.to_string(), "field_type");
        assert_eq!(plans[4].slot.to_string(), "slot_field_type");
        assert!(plans[5].is_header());
    }

    #[test]
    fn suffixes_decide_codecs() {
        let service = load_service(SERVICE);
        let config = GeneratorConfig::default();
        let ctx = GenContext::new(&service, &config).unwrap();
        assert!(ctx.has_encoder("WidgetRequest"));
        assert!(!ctx.has_decoder("WidgetRequest"));
        assert!(!ctx.has_encoder("WidgetOutput"));
        assert!(ctx.has_decoder("WidgetOutput"));
        assert!(ctx.has_encoder("Widget") && ctx.has_decoder("Widget"));
    }
}
