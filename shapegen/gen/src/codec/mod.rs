//! Wire-protocol codec strategies.
//!
//! Encoders are protocol-independent (every protocol flattens requests into
//! the same parameter table), but decoders and the request/response glue of
//! each operation differ. Each protocol implements [`Protocol`]:
//!
//! - [`xml::RestXmlCodec`] - header and XML-bodied REST services
//! - [`json::JsonCodec`] - JSON-bodied query services
//!
//! Both share the structure-decoder skeleton in this module: one slot per
//! member, header members read from the response header table, and a final
//! struct literal that applies the required-member rules.

pub mod json;
pub mod xml;

use proc_macro2::{Ident, TokenStream, TokenTree};
use quote::{format_ident, quote};
use shapegen_define::{Location, Operation, Shape, ShapeKind, StructureShape};
use strum::{Display, EnumString};

use crate::codegen::{GenContext, MemberPlan};
use crate::errors::GeneratorError;

/// Supported wire protocols, parsed from the metadata `protocol` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum ProtocolKind {
    #[strum(serialize = "rest-xml")]
    RestXml,
    #[strum(serialize = "json")]
    Json,
}

impl ProtocolKind {
    /// The codec strategy for this protocol.
    pub fn strategy(self) -> &'static dyn Protocol {
        match self {
            Self::RestXml => &xml::RestXmlCodec,
            Self::Json => &json::JsonCodec,
        }
    }
}

/// A wire protocol's decoder and operation glue.
pub trait Protocol: Sync {
    fn kind(&self) -> ProtocolKind;

    /// Whether a structure's `payload` member (blob or string) is sent as
    /// the raw request body.
    fn raw_payload(&self) -> bool;

    /// Emits `pub struct <Name>Decoder` and its `decode` function.
    fn emit_decoder(
        &self,
        ctx: &GenContext<'_>,
        shape: &Shape,
    ) -> Result<TokenStream, GeneratorError>;

    /// Statements run on `request` right after it is created.
    fn request_setup(&self, ctx: &GenContext<'_>, operation: &Operation) -> TokenStream;

    /// The success-arm expression of an operation returning `output`.
    fn response_decode(
        &self,
        ctx: &GenContext<'_>,
        output: &Shape,
    ) -> Result<TokenStream, GeneratorError>;
}

/// Whether `tokens` mention the identifier `name` anywhere.
pub(crate) fn uses_ident(tokens: &TokenStream, name: &str) -> bool {
    tokens.clone().into_iter().any(|tree| match tree {
        TokenTree::Ident(ident) => ident == name,
        TokenTree::Group(group) => uses_ident(&group.stream(), name),
        _ => false,
    })
}

/// A parameter identifier, underscored when `body` never uses it.
pub(crate) fn param_ident(body: &TokenStream, name: &str) -> Ident {
    if uses_ident(body, name) {
        format_ident!("{}", name)
    } else {
        format_ident!("_{}", name)
    }
}

/// The pieces of a structure decoder shared by every protocol.
pub(crate) struct StructDecoderParts {
    /// `let mut slot_x: Option<T> = None;` for body members.
    pub slots: TokenStream,
    /// `let slot_x: Option<T> = ...;` for header members.
    pub header_slots: TokenStream,
    /// `Ok(Name { ... })`.
    pub finish: TokenStream,
}

impl StructDecoderParts {
    pub fn new(
        ctx: &GenContext<'_>,
        shape: &Shape,
        plans: &[MemberPlan<'_>],
    ) -> Result<Self, GeneratorError> {
        let type_ident = format_ident!("{}", ctx.names.type_name(&shape.name)?);

        let slots = plans.iter().filter(|plan| !plan.is_header()).map(|plan| {
            let slot = &plan.slot;
            let ty = &plan.ty;
            quote! { let mut #slot: Option<#ty> = None; }
        });
        let slots = quote! { #(#slots)* };

        let header_slots = plans.iter().filter(|plan| plan.is_header()).map(|plan| {
            let slot = &plan.slot;
            let ty = &plan.ty;
            let wire = &plan.wire;
            quote! {
                let #slot: Option<#ty> = header_value(headers, #wire)
                    .map(|text| <#ty as Scalar>::from_wire(#wire, text))
                    .transpose()?;
            }
        });
        let header_slots = quote! { #(#header_slots)* };

        let finish = if plans.is_empty() {
            quote! { Ok(#type_ident) }
        } else {
            let shape_name = &shape.name;
            let fields = plans.iter().map(|plan| {
                let field = &plan.field;
                let slot = &plan.slot;
                let wire = &plan.wire;
                let value = if !plan.required {
                    quote! { #slot }
                } else if plan.is_collection() {
                    quote! { #slot.unwrap_or_default() }
                } else {
                    quote! { #slot.ok_or_else(|| ParseError::missing_field(#shape_name, #wire))? }
                };
                quote! { #field: #value }
            });
            quote! { Ok(#type_ident { #(#fields),* }) }
        };

        Ok(Self {
            slots,
            header_slots,
            finish,
        })
    }
}

/// Members of `structure` that are read from the body.
pub(crate) fn body_plans<'p, 's>(plans: &'p [MemberPlan<'s>]) -> Vec<&'p MemberPlan<'s>> {
    plans.iter().filter(|plan| !plan.is_header()).collect()
}

/// Shapes a decoder for `shape` calls into, paired with the member or
/// position that references them.
pub fn decoder_dependencies<'s>(shape: &'s Shape) -> Vec<(String, &'s str)> {
    match &shape.kind {
        ShapeKind::Primitive(_) => Vec::new(),
        ShapeKind::Structure(structure) => structure_body_refs(structure),
        ShapeKind::List(list) => vec![("member".to_string(), list.member.shape.as_str())],
        ShapeKind::Map(map) => vec![
            ("key".to_string(), map.key.shape.as_str()),
            ("value".to_string(), map.value.shape.as_str()),
        ],
    }
}

fn structure_body_refs(structure: &StructureShape) -> Vec<(String, &str)> {
    structure
        .members
        .iter()
        .filter(|(_, member)| member.location != Location::Header)
        .map(|(name, member)| (name.clone(), member.shape.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn protocol_names_parse() {
        assert_eq!(ProtocolKind::from_str("rest-xml").unwrap(), ProtocolKind::RestXml);
        assert_eq!(ProtocolKind::from_str("json").unwrap(), ProtocolKind::Json);
        assert!(ProtocolKind::from_str("ec2").is_err());
        assert_eq!(ProtocolKind::RestXml.to_string(), "rest-xml");
    }

    #[test]
    fn strategies_report_their_kind() {
        assert_eq!(ProtocolKind::RestXml.strategy().kind(), ProtocolKind::RestXml);
        assert!(ProtocolKind::RestXml.strategy().raw_payload());
        assert_eq!(ProtocolKind::Json.strategy().kind(), ProtocolKind::Json);
        assert!(!ProtocolKind::Json.strategy().raw_payload());
    }

    #[test]
    fn ident_usage_is_found_in_groups() {
        let body = quote! { Ok(Foo::decode("x", headers, stack)?) };
        assert!(uses_ident(&body, "headers"));
        assert!(!uses_ident(&body, "value"));
        assert_eq!(param_ident(&body, "value").to_string(), "_value");
        assert_eq!(param_ident(&body, "stack").to_string(), "stack");
    }
}
