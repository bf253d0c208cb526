//! Type declarations for shapes.
//!
//! Structures become `pub struct`s with one `pub` field per member, in
//! schema order. Every other shape becomes a `pub type` alias, except the
//! native string shape which is spelled `String` wherever it is used.
//!
//! ## Examples
//!
//! ```ignore
//! /// A stored widget.
//! #[derive(Debug, Clone, Default, PartialEq)]
//! pub struct Widget {
//!     pub id: String,
//!     pub count: Option<Count>,
//!     pub field_type: Option<WidgetType>,
//! }
//!
//! pub type Count = i32;
//! pub type TagList = Vec<String>;
//! ```

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use shapegen_define::{Shape, ShapeKind};

use super::GenContext;
use crate::docs::doc_attrs;
use crate::errors::GeneratorError;
use crate::naming::NameResolver;

/// Generates the declaration for one shape.
///
/// Returns an empty stream for the native string shape.
pub fn generate_declaration(
    ctx: &GenContext<'_>,
    shape: &Shape,
) -> Result<TokenStream, GeneratorError> {
    if NameResolver::is_native_string(shape) {
        return Ok(TokenStream::new());
    }

    let ident = format_ident!("{}", ctx.names.type_name(&shape.name)?);
    let docs = doc_attrs(shape.documentation.as_deref());

    let ShapeKind::Structure(structure) = &shape.kind else {
        let target = ctx.types().alias_target(shape)?;
        return Ok(quote! {
            #docs
            pub type #ident = #target;
        });
    };

    if structure.members.is_empty() {
        return Ok(quote! {
            #docs
            #[derive(Debug, Clone, Default, PartialEq)]
            pub struct #ident;
        });
    }

    let fields = structure
        .members
        .iter()
        .map(|(name, member)| {
            let field = format_ident!("{}", ctx.names.field_name(name)?);
            let ty = ctx.types().member_type(structure, name, member)?;
            let docs = doc_attrs(member.documentation.as_deref());
            Ok(quote! {
                #docs
                pub #field: #ty
            })
        })
        .collect::<Result<Vec<_>, GeneratorError>>()?;

    Ok(quote! {
        #docs
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct #ident {
            #(#fields),*
        }
    })
}
