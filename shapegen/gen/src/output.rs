//! Output assembly and file writing for generated code.
//!
//! This module handles the final phase of code generation: assembling all
//! generated pieces into one Rust file, validating the output, formatting
//! it, and writing it to disk atomically.
//!
//! ## Output Structure
//!
//! ```text
//! use shapegen::prelude::*;
//!
//! // per shape, in name order
//! pub struct AttributesDecoder; ...
//! pub type Attributes = BTreeMap<String, Count>;
//! pub struct AttributesEncoder; ...
//!
//! // after all shapes
//! pub struct WidgetsClient<D> { ... }
//! ```
//!
//! ## Safety Guarantees
//!
//! - **Validation**: The model is validated before any code is generated
//! - **Syntax**: All generated code is parsed with `syn` before writing
//! - **Formatting**: Output is formatted with `prettyplease` for consistent style
//! - **Atomic writes**: Uses temp file + rename pattern to prevent partial writes

use std::fs;
use std::path::Path;

use proc_macro2::TokenStream;
use quote::quote;
use shapegen_define::ServiceDefinition;
use tracing::{debug, info};

use crate::codegen::{GenContext, generate_client, generate_declaration, generate_encoder};
use crate::config::GeneratorConfig;
use crate::errors::GeneratorError;
use crate::validation::validate_service;

/// Assembles the complete generated module for one service.
///
/// Shapes are emitted in name order, each as decoder, declaration and
/// encoder, followed by the client.
pub fn assemble_service(ctx: &GenContext<'_>) -> Result<TokenStream, GeneratorError> {
    let mut items = TokenStream::new();

    for shape in ctx.service.shapes.values() {
        if ctx.has_decoder(&shape.name) {
            items.extend(ctx.protocol.emit_decoder(ctx, shape)?);
        }
        items.extend(generate_declaration(ctx, shape)?);
        if ctx.has_encoder(&shape.name) {
            items.extend(generate_encoder(ctx, shape)?);
        }
    }
    items.extend(generate_client(ctx)?);

    Ok(quote! {
        use shapegen::prelude::*;

        #items
    })
}

/// Validates that the generated tokens form a valid Rust file.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the tokens cannot be parsed.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {}", e)))
}

/// Formats a parsed file with `prettyplease` and prepends the generated-code notice.
pub fn format_code(file: &syn::File) -> String {
    let formatted = prettyplease::unparse(file);
    format!(
        "// This code was automatically generated by shapegen-gen. Do not edit manually.\n\n{}",
        formatted
    )
}

/// Writes content to a file atomically using a temp file and rename.
///
/// Parent directories are created as needed.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GeneratorError::WriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Validates the service and generates its formatted client module.
///
/// ## Errors
///
/// Returns the first validation or generation error. Nothing is produced
/// for a service that fails any check.
pub fn generate_code(
    service: &ServiceDefinition,
    config: &GeneratorConfig,
) -> Result<String, GeneratorError> {
    let ctx = GenContext::new(service, config)?;
    debug!(
        service = ctx.names.service_ident(),
        protocol = %ctx.protocol.kind(),
        "generating client module"
    );

    validate_service(&ctx)?;
    let tokens = assemble_service(&ctx)?;
    let file = validate_code(&tokens)?;
    Ok(format_code(&file))
}

/// Generates code and writes it to `output`, or prints it to stdout when
/// there is no output path or `dry_run` is set.
///
/// Returns the generated code either way.
pub fn generate_and_write(
    service: &ServiceDefinition,
    config: &GeneratorConfig,
    output: Option<&Path>,
    dry_run: bool,
) -> Result<String, GeneratorError> {
    let code = generate_code(service, config)?;

    match output {
        Some(path) if !dry_run => {
            write_atomic(path, &code)?;
            info!(path = %path.display(), bytes = code.len(), "wrote generated module");
        }
        _ => println!("{}", code),
    }

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_code_contains, load_service};
    use tempfile::TempDir;
    use tracing_test::traced_test;

    const SERVICE: &str = r#"{
        "metadata": {"endpointPrefix": "widgets", "serviceId": "Widgets", "protocol": "rest-xml"},
        "operations": {
            "GetWidget": {
                "name": "GetWidget",
                "http": {"method": "GET", "requestUri": "/widgets/{WidgetId}"},
                "input": {"shape": "GetWidgetRequest"},
                "output": {"shape": "GetWidgetOutput"}
            }
        },
        "shapes": {
            "String": {"type": "string"},
            "GetWidgetRequest": {
                "type": "structure",
                "required": ["Id"],
                "members": {"Id": {"shape": "String", "location": "uri", "locationName": "WidgetId"}}
            },
            "GetWidgetOutput": {"type": "structure", "members": {"Name": {"shape": "String"}}}
        }
    }"#;

    fn generated() -> String {
        generate_code(&load_service(SERVICE), &GeneratorConfig::default()).unwrap()
    }

    #[test]
    fn output_starts_with_notice_and_prelude() {
        let code = generated();
        assert!(code.starts_with("// This code was automatically generated by shapegen-gen."));
        assert_code_contains(&code, "use shapegen::prelude::*;");
    }

    #[test]
    fn suffixes_decide_which_codecs_are_emitted() {
        let code = generated();
        assert_code_contains(&code, "pub struct GetWidgetRequestEncoder;");
        assert!(!code.contains("GetWidgetRequestDecoder"));
        assert_code_contains(&code, "pub struct GetWidgetOutputDecoder;");
        assert!(!code.contains("GetWidgetOutputEncoder"));
        assert_code_contains(&code, "pub struct StringDecoder;");
        assert_code_contains(&code, "pub struct StringEncoder;");
        assert!(!code.contains("pub type String"));
    }

    #[test]
    fn shapes_are_emitted_in_name_order_then_client() {
        let code = generated();
        let output = code.find("pub struct GetWidgetOutput {").unwrap();
        let request = code.find("pub struct GetWidgetRequest {").unwrap();
        let client = code.find("pub struct WidgetsClient").unwrap();
        assert!(output < request && request < client);

        let decoder = code.find("pub struct GetWidgetOutputDecoder").unwrap();
        assert!(decoder < output);
    }

    #[test]
    #[traced_test]
    fn generation_logs_progress() {
        generated();
        assert!(logs_contain("generating client module"));
        assert!(logs_contain("service validated"));
    }

    #[test]
    fn output_is_deterministic() {
        assert_eq!(generated(), generated());
    }

    #[test]
    fn invalid_service_produces_nothing() {
        let service = load_service(
            r#"{
                "metadata": {"endpointPrefix": "widgets", "protocol": "rest-xml"},
                "shapes": {
                    "A": {"type": "structure", "members": {"Inner": {"shape": "A"}}}
                }
            }"#,
        );
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("widgets.rs");
        let err = generate_and_write(&service, &GeneratorConfig::default(), Some(&path), false)
            .unwrap_err();
        assert!(matches!(err, GeneratorError::RecursiveShape { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn validate_code_rejects_invalid_tokens() {
        let Err(err) = validate_code(&quote! { pub fn }) else {
            panic!("truncated item should not parse");
        };
        assert!(err.to_string().contains("Generated code is invalid"));
    }

    #[test]
    fn write_atomic_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out/widgets.rs");
        write_atomic(&path, "// generated\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "// generated\n");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn generate_and_write_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("widgets.rs");
        let code = generate_and_write(
            &load_service(SERVICE),
            &GeneratorConfig::default(),
            Some(&path),
            false,
        )
        .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), code);
    }

    #[test]
    fn dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("widgets.rs");
        generate_and_write(
            &load_service(SERVICE),
            &GeneratorConfig::default(),
            Some(&path),
            true,
        )
        .unwrap();
        assert!(!path.exists());
    }
}
