//! Shape to Rust type mapping.
//!
//! References to another shape always use that shape's resolved name, so a
//! `pub type` alias is the single place a list, map or primitive expands.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use shapegen_define::{Member, PrimitiveKind, Shape, ShapeKind, StructureShape};

use crate::errors::GeneratorError;
use crate::naming::NameResolver;

/// The Rust type for a primitive kind.
pub fn primitive_type(kind: PrimitiveKind) -> TokenStream {
    match kind {
        PrimitiveKind::String | PrimitiveKind::Timestamp => quote! { String },
        PrimitiveKind::Integer => quote! { i32 },
        PrimitiveKind::Long => quote! { i64 },
        PrimitiveKind::Float => quote! { f32 },
        PrimitiveKind::Double => quote! { f64 },
        PrimitiveKind::Blob => quote! { Vec<u8> },
        PrimitiveKind::Boolean => quote! { bool },
    }
}

/// Maps shapes and members to type expressions.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    names: &'a NameResolver<'a>,
}

impl<'a> TypeMapper<'a> {
    pub fn new(names: &'a NameResolver<'a>) -> Self {
        Self { names }
    }

    /// The type used wherever the shape called `shape_name` is referenced.
    pub fn reference(&self, shape_name: &str) -> Result<TokenStream, GeneratorError> {
        let ident = format_ident!("{}", self.names.type_name(shape_name)?);
        Ok(quote! { #ident })
    }

    /// The right-hand side of a non-structure shape's `pub type` alias.
    ///
    /// Returns `None` for structures, which are declared rather than aliased.
    pub fn alias_target(&self, shape: &Shape) -> Result<Option<TokenStream>, GeneratorError> {
        let target = match &shape.kind {
            ShapeKind::Primitive(kind) => primitive_type(*kind),
            ShapeKind::List(list) => {
                let element = self.reference(&list.member.shape)?;
                quote! { Vec<#element> }
            }
            ShapeKind::Map(map) => {
                let key = self.reference(&map.key.shape)?;
                let value = self.reference(&map.value.shape)?;
                quote! { BTreeMap<#key, #value> }
            }
            ShapeKind::Structure(_) => return Ok(None),
        };
        Ok(Some(target))
    }

    /// The declared type of a structure field, wrapped in `Option` unless
    /// the member is required.
    pub fn member_type(
        &self,
        structure: &StructureShape,
        member_name: &str,
        member: &Member,
    ) -> Result<TokenStream, GeneratorError> {
        let inner = self.reference(&member.shape)?;
        if structure.is_required(member_name) {
            Ok(inner)
        } else {
            Ok(quote! { Option<#inner> })
        }
    }
}
