//! REST-XML decoders.
//!
//! Every decoder has the shape
//!
//! ```text
//! pub fn decode(tag_name: &str, headers: &HeaderMap, stack: &mut XmlReader) -> Result<T, ParseError>
//! ```
//!
//! and consumes exactly the element(s) it is responsible for. Lists are
//! flattened: a list decoder reads consecutive `<tag_name>` siblings, and a
//! member with its own wrapper element opens and closes the wrapper around
//! that call. Unknown children are skipped, so every scan iteration consumes
//! at least one element.

use proc_macro2::TokenStream;
use quote::quote;
use shapegen_define::{Operation, Shape, ShapeKind, StructureShape};

use super::{Protocol, ProtocolKind, StructDecoderParts, body_plans, param_ident};
use crate::codegen::{GenContext, MemberPlan, element_wire_name, map_entry_wire_names};
use crate::errors::GeneratorError;

/// Codec strategy for `rest-xml` services.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestXmlCodec;

impl Protocol for RestXmlCodec {
    fn kind(&self) -> ProtocolKind {
        ProtocolKind::RestXml
    }

    fn raw_payload(&self) -> bool {
        true
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
                stack.start_element(tag_name)?;
                let obj = <#ty as Scalar>::from_wire(tag_name, &stack.characters()?)?;
                stack.end_element(tag_name)?;
                Ok(obj)
            },
            ShapeKind::List(list) => {
                let element = ctx.decoder_ident(&list.member.shape)?;
                quote! {
                    let mut obj = #ty::new();
                    while stack.peek_start()? == Some(tag_name) {
                        obj.push(#element::decode(tag_name, headers, stack)?);
                    }
                    Ok(obj)
                }
            }
            ShapeKind::Map(map) => {
                let key_decoder = ctx.decoder_ident(&map.key.shape)?;
                let value_decoder = ctx.decoder_ident(&map.value.shape)?;
                let (key_wire, value_wire) = map_entry_wire_names(map);
                quote! {
                    let mut obj = #ty::new();
                    while stack.peek_start()? == Some(tag_name) {
                        stack.start_element(tag_name)?;
                        let key = #key_decoder::decode(#key_wire, headers, stack)?;
                        let value = #value_decoder::decode(#value_wire, headers, stack)?;
                        stack.end_element(tag_name)?;
                        obj.entry(key).or_insert(value);
                    }
                    Ok(obj)
                }
            }
            ShapeKind::Structure(structure) => struct_body(ctx, shape, structure)?,
        };

        let tag_name = param_ident(&body, "tag_name");
        let headers = param_ident(&body, "headers");
        let stack = param_ident(&body, "stack");

        Ok(quote! {
            pub struct #decoder;

            impl #decoder {
                pub fn decode(#tag_name: &str, #headers: &HeaderMap, #stack: &mut XmlReader) -> Result<#ty, ParseError> {
                    #body
                }
            }
        })
    }

    fn request_setup(&self, _ctx: &GenContext<'_>, _operation: &Operation) -> TokenStream {
        TokenStream::new()
    }

    fn response_decode(
        &self,
        ctx: &GenContext<'_>,
        output: &Shape,
    ) -> Result<TokenStream, GeneratorError> {
        let decoder = ctx.decoder_ident(&output.name)?;
        let default_root = &output.name;
        Ok(quote! {
            let mut stack = XmlReader::for_response(&response.body, #default_root)?;
            let root = stack.root_name();
            Ok(#decoder::decode(&root, &response.headers, &mut stack)?)
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
        quote! {
            while stack.peek_start()?.is_some() {
                stack.skip_element()?;
            }
        }
    } else {
        let arms = body_members
            .iter()
            .map(|plan| member_arm(ctx, plan))
            .collect::<Result<Vec<_>, _>>()?;
        quote! {
            loop {
                let current_name = match stack.peek_start()? {
                    Some(name) => name.to_owned(),
                    None => break,
                };
                match current_name.as_str() {
                    #(#arms)*
                    _ => stack.skip_element()?,
                }
            }
        }
    };

    Ok(quote! {
        stack.start_element(tag_name)?;
        #slots
        #scan
        stack.end_element(tag_name)?;
        #header_slots
        #finish
    })
}

fn member_arm(ctx: &GenContext<'_>, plan: &MemberPlan<'_>) -> Result<TokenStream, GeneratorError> {
    let decoder = ctx.decoder_ident(&plan.member.shape)?;
    let slot = &plan.slot;
    let wire = &plan.wire;

    let arm = if let Some(list) = plan.target.as_list()
        && plan.is_wrapped_list()
    {
        let element_wire = element_wire_name(&list.member);
        quote! {
            #wire => {
                stack.start_element(#wire)?;
                merge_into(&mut #slot, #decoder::decode(#element_wire, headers, stack)?);
                stack.end_element(#wire)?;
            }
        }
    } else if plan.is_collection() {
        quote! {
            #wire => merge_into(&mut #slot, #decoder::decode(#wire, headers, stack)?),
        }
    } else {
        quote! {
            #wire => #slot = Some(#decoder::decode(#wire, headers, stack)?),
        }
    };
    Ok(arm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::test_utils::{assert_code_contains, format_generated_code, load_service};

    const SERVICE: &str = r#"{
        "metadata": {"endpointPrefix": "widgets", "serviceId": "Widgets", "protocol": "rest-xml"},
        "shapes": {
            "String": {"type": "string"},
            "Count": {"type": "integer"},
            "TagList": {"type": "list", "member": {"shape": "String", "locationName": "Tag"}},
            "Attributes": {"type": "map", "key": {"shape": "String"}, "value": {"shape": "Count"}},
            "Widget": {
                "type": "structure",
                "required": ["Id", "Tags"],
                "members": {
                    "Id": {"shape": "String"},
                    "Tags": {"shape": "TagList"},
                    "Labels": {"shape": "TagList", "locationName": "LabelSet"},
                    "Attributes": {"shape": "Attributes"},
                    "ETag": {"shape": "String", "location": "header", "locationName": "ETag"}
                }
            },
            "Empty": {"type": "structure", "members": {}}
        }
    }"#;

    fn decoder_for(name: &str) -> String {
        let service = load_service(SERVICE);
        let config = GeneratorConfig::default();
        let ctx = GenContext::new(&service, &config).unwrap();
        let shape = service.shape(name).unwrap();
        let tokens = RestXmlCodec.emit_decoder(&ctx, shape).unwrap();
        format_generated_code(&tokens).unwrap()
    }

    #[test]
    fn primitive_decoder_reads_element_text() {
        let code = decoder_for("Count");
        assert_code_contains(&code, "pub struct CountDecoder;");
        assert_code_contains(&code, "_headers: &HeaderMap");
        assert_code_contains(
            &code,
            "<Count as Scalar>::from_wire(tag_name, &stack.characters()?)?",
        );
    }

    #[test]
    fn list_decoder_reads_consecutive_siblings() {
        let code = decoder_for("TagList");
        assert_code_contains(&code, "while stack.peek_start()? == Some(tag_name)");
        assert_code_contains(&code, "obj.push(StringDecoder::decode(tag_name, headers, stack)?)");
    }

    #[test]
    fn map_decoder_keeps_first_key() {
        let code = decoder_for("Attributes");
        assert_code_contains(&code, r#"StringDecoder::decode("key", headers, stack)?"#);
        assert_code_contains(&code, r#"CountDecoder::decode("value", headers, stack)?"#);
        assert_code_contains(&code, "obj.entry(key).or_insert(value)");
    }

    #[test]
    fn struct_decoder_scans_children() {
        let code = decoder_for("Widget");
        assert_code_contains(&code, r#"slot_id = Some(StringDecoder::decode("Id", headers, stack)?)"#);
        assert_code_contains(
            &code,
            r#"merge_into(&mut slot_tags, TagListDecoder::decode("Tag", headers, stack)?)"#,
        );
        assert_code_contains(&code, r#"stack.start_element("LabelSet")?"#);
        assert_code_contains(
            &code,
            r#"merge_into(&mut slot_labels, TagListDecoder::decode("Tag", headers, stack)?)"#,
        );
        assert_code_contains(&code, "_ => stack.skip_element()?");
        assert_code_contains(&code, r#"header_value(headers, "ETag")"#);
        assert_code_contains(&code, r#"ParseError::missing_field("Widget", "Id")"#);
        assert_code_contains(&code, "tags: slot_tags.unwrap_or_default()");
        assert_code_contains(&code, "labels: slot_labels");
    }

    #[test]
    fn empty_struct_skips_everything() {
        let code = decoder_for("Empty");
        assert_code_contains(&code, "while stack.peek_start()?.is_some()");
        assert_code_contains(&code, "Ok(Empty)");
        assert_code_contains(&code, "_headers: &HeaderMap");
    }

    #[test]
    fn response_decode_uses_document_root() {
        let service = load_service(SERVICE);
        let config = GeneratorConfig::default();
        let ctx = GenContext::new(&service, &config).unwrap();
        let tokens = RestXmlCodec
            .response_decode(&ctx, service.shape("Widget").unwrap())
            .unwrap();
        let code = tokens.to_string();
        assert_code_contains(&code, r#"XmlReader::for_response(&response.body, "Widget")?"#);
        assert_code_contains(&code, "let root = stack.root_name();");
        assert_code_contains(&code, "WidgetDecoder::decode(&root, &response.headers, &mut stack)?");
    }
}
