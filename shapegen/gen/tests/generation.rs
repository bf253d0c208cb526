//! End-to-end tests: load the bundled service descriptions and generate.
//!
//! Compiling the output is covered by the `shapegen-schema` crate, which
//! builds these same descriptions from its build script.

use std::fs;
use std::path::{Path, PathBuf};

use shapegen_define::ServiceDefinition;
use shapegen_gen::config::GeneratorConfig;
use shapegen_gen::errors::GeneratorError;
use shapegen_gen::output::{generate_and_write, generate_code};
use tempfile::TempDir;

fn services_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../schema/services")
}

fn load(name: &str) -> ServiceDefinition {
    ServiceDefinition::from_path(&services_dir().join(format!("{name}.json")))
        .unwrap_or_else(|e| panic!("failed to load {name}: {e}"))
}

/// Removes whitespace so checks do not depend on line wrapping.
fn compact(code: &str) -> String {
    code.chars().filter(|c| !c.is_whitespace()).collect()
}

fn assert_has(code: &str, needle: &str) {
    assert!(
        compact(code).contains(&compact(needle)),
        "generated code is missing `{needle}`"
    );
}

#[test]
fn widgets_module_has_every_part() {
    let code = generate_code(&load("widgets"), &GeneratorConfig::default()).unwrap();

    assert_has(&code, "use shapegen::prelude::*;");
    assert_has(&code, "pub struct Widget {");
    assert_has(&code, "pub struct WidgetEncoder;");
    assert_has(&code, "pub struct WidgetDecoder;");
    assert_has(&code, "pub type WidgetsMessage = String;");
    assert_has(&code, "pub field_type: Option<String>");
    assert_has(&code, "pub struct WidgetsClient<D>");
    assert_has(&code, "Client for Widget Store.");

    for method in [
        "delete_widget",
        "describe_widget",
        "get_widget",
        "list_widgets",
        "put_widget",
    ] {
        assert_has(&code, &format!("pub async fn {method}("));
    }

    assert_has(&code, "XmlReader::for_response(&response.body, \"Widget\")?");
    assert!(!code.contains("parse_json"));
    assert!(!code.contains("ListWidgetsOutputEncoder"));
    assert!(!code.contains("PutWidgetRequestDecoder"));
}

#[test]
fn widgets_raw_payload_is_sent_as_body() {
    let code = generate_code(&load("widgets"), &GeneratorConfig::default()).unwrap();
    assert_has(&code, "request.set_payload(value.clone());");
    assert_has(&code, "request.add_header(\"Content-Type\", value.to_wire());");
    assert_has(&code, "request.set_path_param(\"WidgetId\", value.to_wire());");
}

#[test]
fn gadgets_module_uses_json_protocol() {
    let code = generate_code(&load("gadgets"), &GeneratorConfig::default()).unwrap();

    assert_has(&code, "pub struct GadgetsError {");
    assert_has(&code, "pub last_error: Option<GadgetsError>");
    assert_has(&code, "pub struct GadgetsClient<D>");
    assert_has(&code, "let value = parse_json(&response.body)?;");
    assert_has(
        &code,
        "request.add_header(\"X-Amz-Target\", \"GadgetCatalog_20231115.GetGadget\");",
    );
    assert!(!code.contains("XmlReader"));
}

#[test]
fn protocol_override_replaces_metadata() {
    let config = GeneratorConfig::default().with_protocol("json");
    let code = generate_code(&load("widgets"), &config).unwrap();
    assert_has(&code, "parse_json(&response.body)?");
    assert!(!code.contains("XmlReader"));
}

#[test]
fn unsupported_protocol_is_rejected() {
    let config = GeneratorConfig::default().with_protocol("ec2");
    let err = generate_code(&load("widgets"), &config).unwrap_err();
    assert!(matches!(err, GeneratorError::UnsupportedProtocol(ref name) if name == "ec2"));
}

#[test]
fn service_name_override_changes_client_and_prefixes() {
    let config = GeneratorConfig::default().with_service_name("Shop");
    let code = generate_code(&load("widgets"), &config).unwrap();
    assert_has(&code, "pub struct ShopClient<D>");
    assert_has(&code, "pub type ShopMessage = String;");
}

#[test]
fn writes_generated_module_to_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("src/gadgets.rs");

    let code = generate_and_write(&load("gadgets"), &GeneratorConfig::default(), Some(&path), false)
        .unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), code);
    syn::parse_file(&code).unwrap();
}

#[test]
fn generation_is_stable_across_runs() {
    let service = load("widgets");
    let config = GeneratorConfig::default();
    assert_eq!(
        generate_code(&service, &config).unwrap(),
        generate_code(&service, &config).unwrap()
    );
}

#[test]
fn dangling_reference_fails_to_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(
        &path,
        r#"{
            "metadata": {"endpointPrefix": "broken", "protocol": "json"},
            "shapes": {"A": {"type": "structure", "members": {"B": {"shape": "Missing"}}}}
        }"#,
    )
    .unwrap();

    assert!(ServiceDefinition::from_path(&path).is_err());
}
