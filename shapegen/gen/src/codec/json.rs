//! JSON decoders and operation glue.
//!
//! Decoders take an already-parsed `JsonValue` and the name of the field
//! it came from, which is used in error messages. Null members are treated
//! as absent and unknown members are ignored.

use proc_macro2::TokenStream;
use quote::quote;
use shapegen_define::{Operation, Shape, ShapeKind, StructureShape};

use super::{Protocol, ProtocolKind, StructDecoderParts, body_plans, param_ident};
use crate::codegen::GenContext;
use crate::errors::GeneratorError;

/// Codec strategy for `json` services.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Protocol for JsonCodec {
    fn kind(&self) -> ProtocolKind {
        ProtocolKind::Json
    }

    fn raw_payload(&self) -> bool {
        false
    }

    fn emit_decoder(
        &self,
        ctx: &GenContext<'_>,
        shape: &Shape,
    ) -> Result<TokenStream, GeneratorError> {
        let decoder = ctx.decoder_ident(&shape.name)?;
        let ty = ctx.types().reference(&shape.name)?;

        let body = match &shape.kind {
            ShapeKind::Primitive(_) => quote! {
                <#ty as Scalar>::from_json(field_name, value)
            },
            ShapeKind::List(list) => {
                let element = ctx.decoder_ident(&list.member.shape)?;
                quote! {
                    expect_array(field_name, value)?
                        .iter()
                        .map(|item| #element::decode(field_name, headers, item))
                        .collect()
                }
            }
            ShapeKind::Map(map) => {
                let key_decoder = ctx.decoder_ident(&map.key.shape)?;
                let value_decoder = ctx.decoder_ident(&map.value.shape)?;
                quote! {
                    let mut obj = #ty::new();
                    for (key, item) in expect_object(field_name, value)? {
                        let key = #key_decoder::decode(field_name, headers, &JsonValue::String(key.clone()))?;
                        let item = #value_decoder::decode(field_name, headers, item)?;
                        obj.entry(key).or_insert(item);
                    }
                    Ok(obj)
                }
            }
            ShapeKind::Structure(structure) => struct_body(ctx, shape, structure)?,
        };

        let field_name = param_ident(&body, "field_name");
        let headers = param_ident(&body, "headers");
        let value = param_ident(&body, "value");

        Ok(quote! {
            pub struct #decoder;

            impl #decoder {
                pub fn decode(#field_name: &str, #headers: &HeaderMap, #value: &JsonValue) -> Result<#ty, ParseError> {
                    #body
                }
            }
        })
    }

    fn request_setup(&self, ctx: &GenContext<'_>, operation: &Operation) -> TokenStream {
        let metadata = &ctx.service.metadata;
        let action = &operation.name;

        let version = metadata.api_version.as_ref().map(|version| {
            quote! { request.params_mut().put("Version", #version); }
        });
        let target = metadata.target_prefix.as_ref().map(|prefix| {
            let target = format!("{prefix}.{action}");
            quote! { request.add_header("X-Amz-Target", #target); }
        });
        let content_type = metadata.json_version.as_ref().map(|json_version| {
            let content_type = format!("application/x-amz-json-{json_version}");
            quote! { request.add_header("Content-Type", #content_type); }
        });

        quote! {
            request.params_mut().put("Action", #action);
            #version
            #target
            #content_type
        }
    }

    fn response_decode(
        &self,
        ctx: &GenContext<'_>,
        output: &Shape,
    ) -> Result<TokenStream, GeneratorError> {
        let decoder = ctx.decoder_ident(&output.name)?;
        let root = &output.name;
        Ok(quote! {
            let value = parse_json(&response.body)?;
            Ok(#decoder::decode(#root, &response.headers, &value)?)
        })
    }
}

fn struct_body(
    ctx: &GenContext<'_>,
    shape: &Shape,
    structure: &StructureShape,
) -> Result<TokenStream, GeneratorError> {
    let plans = ctx.member_plans(structure)?;
    let parts = StructDecoderParts::new(ctx, shape, &plans)?;
    let slots = &parts.slots;
    let header_slots = &parts.header_slots;
    let finish = &parts.finish;

    let body_members = body_plans(&plans);
    let scan = if body_members.is_empty() {
        quote! { expect_object(field_name, value)?; }
    } else {
        let arms = body_members
            .iter()
            .map(|plan| {
                let decoder = ctx.decoder_ident(&plan.member.shape)?;
                let slot = &plan.slot;
                let wire = &plan.wire;
                Ok(if plan.is_collection() {
                    quote! { #wire => merge_into(&mut #slot, #decoder::decode(#wire, headers, item)?), }
                } else {
                    quote! { #wire => #slot = Some(#decoder::decode(#wire, headers, item)?), }
                })
            })
            .collect::<Result<Vec<_>, GeneratorError>>()?;
        quote! {
            for (key, item) in expect_object(field_name, value)? {
                if item.is_null() {
                    continue;
                }
                match key.as_str() {
                    #(#arms)*
                    _ => {}
                }
            }
        }
    };

    Ok(quote! {
        #slots
        #scan
        #header_slots
        #finish
    })
}
