//! Shared test utilities for shapegen-gen tests.

use proc_macro2::TokenStream;
use shapegen_define::ServiceDefinition;

/// Loads a service document, panicking on schema errors.
pub fn load_service(json: &str) -> ServiceDefinition {
    ServiceDefinition::from_json(json).unwrap_or_else(|e| panic!("invalid test service: {e}"))
}

/// Formats generated tokens as pretty-printed Rust code.
pub fn format_generated_code(tokens: &TokenStream) -> Result<String, String> {
    let file = syn::parse2::<syn::File>(tokens.clone()).map_err(|e| e.to_string())?;
    Ok(prettyplease::unparse(&file))
}

/// Drops whitespace and trailing commas so comparisons ignore line wrapping.
fn normalize(code: &str) -> String {
    let compact: Vec<char> = code.chars().filter(|c| !c.is_whitespace()).collect();
    compact
        .iter()
        .enumerate()
        .filter(|(i, c)| {
            **c != ',' || !matches!(compact.get(i + 1), Some(')' | ']' | '}'))
        })
        .map(|(_, c)| *c)
        .collect()
}

/// Asserts that `code` contains `expected`, ignoring formatting differences.
#[track_caller]
pub fn assert_code_contains(code: &str, expected: &str) {
    assert!(
        normalize(code).contains(&normalize(expected)),
        "expected generated code to contain:\n{expected}\n\ngot:\n{code}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    #[test]
    fn format_generated_code_pretty_prints() {
        let code = format_generated_code(&quote! { pub struct Foo { pub a: i32 } }).unwrap();
        assert!(code.contains("pub struct Foo {\n    pub a: i32,\n}"));
    }

    #[test]
    fn format_generated_code_rejects_invalid_tokens() {
        assert!(format_generated_code(&quote! { pub struct }).is_err());
    }

    #[test]
    fn comparison_ignores_wrapping() {
        let code = "fn f(\n    a: i32,\n    b: i32,\n) {}";
        assert_code_contains(code, "fn f(a: i32, b: i32)");
    }
}
