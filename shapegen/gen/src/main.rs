//! Shapegen Code Generator
//!
//! Generates a typed Rust client module from a service shape description.

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use shapegen_define::ServiceDefinition;
use shapegen_gen::config::{DEFAULT_FIELD_PREFIX, GeneratorConfig};
use shapegen_gen::errors::GeneratorError;
use shapegen_gen::output::generate_and_write;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Shapegen code generator - transforms service shape descriptions into typed Rust clients
#[derive(Parser, Debug)]
#[command(name = "shapegen-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Service description (JSON with metadata, operations and shapes)
    input: PathBuf,

    /// Write the generated module to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the protocol named in the service metadata (rest-xml, json)
    #[arg(long)]
    protocol: Option<String>,

    /// Override the service identifier used for the client and reserved-name prefixes
    #[arg(long)]
    service_name: Option<String>,

    /// Prefix for members and operations whose names are Rust keywords
    #[arg(long, default_value = DEFAULT_FIELD_PREFIX)]
    field_prefix: String,

    /// Additional shape names to prefix with the service identifier
    #[arg(long, value_name = "NAME")]
    reserved: Vec<String>,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn config(&self) -> GeneratorConfig {
        let mut config = GeneratorConfig::default()
            .with_reserved(self.reserved.iter().cloned())
            .with_field_prefix(&self.field_prefix);
        if let Some(name) = &self.service_name {
            config = config.with_service_name(name);
        }
        if let Some(protocol) = &self.protocol {
            config = config.with_protocol(protocol);
        }
        config
    }
}

/// Initialize tracing subscriber based on verbosity and output format
fn init_tracing(verbose: u8, json: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,shapegen_gen=info".to_string(),
            2 => "info,shapegen_gen=debug,shapegen_define=debug".to_string(),
            _ => "debug,shapegen_gen=trace,shapegen_define=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

fn main() -> Result<(), GeneratorError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json);

    let service = ServiceDefinition::from_path(&cli.input)?;
    info!(
        input = %cli.input.display(),
        operations = service.operations.len(),
        shapes = service.shapes.len(),
        "loaded service description"
    );

    let config = cli.config();
    let output = cli.output.as_deref();
    generate_and_write(&service, &config, output, cli.dry_run)?;

    if let Some(path) = output
        && !cli.dry_run
    {
        eprintln!(
            "{} {}",
            "Generated".green().bold(),
            path.display().to_string().cyan()
        );
    }

    Ok(())
}
