//! Request encoders.
//!
//! An encoder flattens a value into a `ServiceRequest`:
//!
//! ```ignore
//! pub struct WidgetEncoder;
//!
//! impl WidgetEncoder {
//!     pub fn encode(request: &mut ServiceRequest, name: &str, obj: &Widget) {
//!         {
//!             let value = &obj.id;
//!             StringEncoder::encode(request, &join_path(name, "Id"), value);
//!         }
//!         if let Some(value) = &obj.tags {
//!             TagListEncoder::encode(request, &join_path(name, "Tag"), value);
//!         }
//!     }
//! }
//! ```
//!
//! Payload members become dotted parameters under the parent's name, list
//! elements are numbered from 1 and map entries become `N.key` / `N.value`
//! pairs, or the key and value `locationName` when the map sets one. Header,
//! uri and querystring members are written to their location by wire-name.
//! Encoders are protocol-independent; the only protocol input is whether a
//! structure's blob or string `payload` member is sent raw.

use proc_macro2::TokenStream;
use quote::quote;
use shapegen_define::{Location, PrimitiveKind, Shape, ShapeKind, StructureShape};

use super::{GenContext, MemberPlan, map_entry_wire_names};
use crate::codec::param_ident;
use crate::errors::GeneratorError;

/// Generates `<Name>Encoder` for one shape.
pub fn generate_encoder(ctx: &GenContext<'_>, shape: &Shape) -> Result<TokenStream, GeneratorError> {
    let encoder = ctx.encoder_ident(&shape.name)?;
    let ty = ctx.types().reference(&shape.name)?;

    let body = match &shape.kind {
        ShapeKind::Primitive(_) => quote! {
            request.params_mut().put(name, obj.to_wire());
        },
        ShapeKind::List(list) => {
            let element = ctx.encoder_ident(&list.member.shape)?;
            quote! {
                for (index, element) in obj.iter().enumerate() {
                    #element::encode(request, &join_path(name, index + 1), element);
                }
            }
        }
        ShapeKind::Map(map) => {
            let key_encoder = ctx.encoder_ident(&map.key.shape)?;
            let value_encoder = ctx.encoder_ident(&map.value.shape)?;
            let (key_wire, value_wire) = map_entry_wire_names(map);
            quote! {
                for (index, (key, value)) in obj.iter().enumerate() {
                    let entry = join_path(name, index + 1);
                    #key_encoder::encode(request, &join_path(&entry, #key_wire), key);
                    #value_encoder::encode(request, &join_path(&entry, #value_wire), value);
                }
            }
        }
        ShapeKind::Structure(structure) => struct_body(ctx, structure)?,
    };

    let request = param_ident(&body, "request");
    let name = param_ident(&body, "name");
    let obj = param_ident(&body, "obj");

    Ok(quote! {
        pub struct #encoder;

        impl #encoder {
            pub fn encode(#request: &mut ServiceRequest, #name: &str, #obj: &#ty) {
                #body
            }
        }
    })
}

fn struct_body(
    ctx: &GenContext<'_>,
    structure: &StructureShape,
) -> Result<TokenStream, GeneratorError> {
    let statements = ctx
        .member_plans(structure)?
        .iter()
        .map(|plan| {
            let write = member_write(ctx, structure, plan)?;
            let field = &plan.field;
            Ok(if plan.required {
                quote! {
                    {
                        let value = &obj.#field;
                        #write
                    }
                }
            } else {
                quote! {
                    if let Some(value) = &obj.#field {
                        #write
                    }
                }
            })
        })
        .collect::<Result<Vec<_>, GeneratorError>>()?;
    Ok(quote! { #(#statements)* })
}

/// Statement writing the member bound to `value`.
fn member_write(
    ctx: &GenContext<'_>,
    structure: &StructureShape,
    plan: &MemberPlan<'_>,
) -> Result<TokenStream, GeneratorError> {
    let wire = &plan.wire;
    let write = match plan.member.location {
        Location::Header => quote! { request.add_header(#wire, value.to_wire()); },
        Location::Uri => quote! { request.set_path_param(#wire, value.to_wire()); },
        Location::QueryString => quote! { request.params_mut().put(#wire, value.to_wire()); },
        Location::Payload if is_raw_payload(ctx, structure, plan) => {
            quote! { request.set_payload(value.clone()); }
        }
        Location::Payload => {
            let encoder = ctx.encoder_ident(&plan.member.shape)?;
            quote! { #encoder::encode(request, &join_path(name, #wire), value); }
        }
    };
    Ok(write)
}

/// Whether `plan` is the structure's payload member and is sent as the body.
pub(crate) fn is_raw_payload(
    ctx: &GenContext<'_>,
    structure: &StructureShape,
    plan: &MemberPlan<'_>,
) -> bool {
    ctx.protocol.raw_payload()
        && structure.payload.as_deref() == Some(plan.name)
        && matches!(
            plan.target.primitive(),
            Some(PrimitiveKind::Blob | PrimitiveKind::String)
        )
}
