//! Generates one client module per bundled service description.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use shapegen_define::ServiceDefinition;
use shapegen_gen::config::GeneratorConfig;
use shapegen_gen::output::generate_code;

const SERVICES: &[&str] = &["widgets", "gadgets"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);

    for name in SERVICES {
        let input = Path::new("services").join(format!("{name}.json"));
        println!("cargo:rerun-if-changed={}", input.display());

        let service = ServiceDefinition::from_path(&input)?;
        let code = generate_code(&service, &GeneratorConfig::default())?;
        fs::write(out_dir.join(format!("{name}.rs")), code)?;
    }

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
