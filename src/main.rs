//! Command-line interface for test-data-gen
//!
//! # Usage Examples
//!
//! ```bash
//! # One SimpleModel as JSON
//! test-data-gen generate --schema models.yaml --type SimpleModel
//!
//! # Reproducible batch with custom string decoration
//! test-data-gen generate --schema models.yaml --type "Map<String, SimpleModel>" \
//!   --count 5 --seed 7 --prefix "it_" --postfix "_end"
//!
//! # Settings from a config file, container sizes overridden
//! test-data-gen generate --schema models.yaml --type "Set<SimpleModel>" \
//!   --config generation.yaml --max-items 2
//!
//! # Classes and settable properties
//! test-data-gen types --schema models.yaml
//! ```
//!
//! Logging is controlled through `RUST_LOG`, e.g. `RUST_LOG=test_data_generator=debug`.

use clap::Parser;
use test_data_gen::{run_generate, run_types, Cli, Commands};

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => run_generate(&args),
        Commands::Types(args) => run_types(&args),
    }
}
