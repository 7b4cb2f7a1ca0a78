//! Generates the API specification to a JSON file.
//!
//! Run with: cargo run --bin gen-spec -p apispec-server -- --config apispec.toml
//!
//! The configuration defaults to the platform path; the output defaults to
//! `output.path` from the configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use apispec_core::{load_inventory, save_specification, Config};
use apispec_server::state::generate;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "gen-spec",
    version,
    about = "Generate the API specification from an endpoint inventory"
)]
struct Cli {
    /// Configuration file (defaults to the platform configuration path)
    #[arg(short, long, env = "APISPEC_CONFIG")]
    config: Option<PathBuf>,

    /// Output file (defaults to `output.path` from the configuration)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    let output_path = cli.output.unwrap_or_else(|| config.output.path.clone());

    println!("Generating specification...\n");

    let inventory = load_inventory(&config.inventory.path)
        .with_context(|| format!("Failed to read {}", config.inventory.path.display()))?;
    let specification = generate(&config, &inventory)?;
    save_specification(&specification, &output_path)?;

    println!("Written to: {}", output_path.display());
    println!("Types: {}", specification.types.len());
    println!("Modules: {}", specification.modules.len());
    println!("Endpoints: {}", specification.endpoints().count());

    println!("\nSpecification generated successfully!");
    Ok(())
}
