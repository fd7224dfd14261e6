//! Catalog Diff CLI
//!
//! Compares two catalog snapshots and reports stream and field changes.
//!
//! Usage:
//!   catalog-diff --old catalog_v1.json --new catalog_v2.json
//!   catalog-diff --old a.json --new b.json --format json --fail-on-change

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use catalog_diff::{Catalog, DiffConfig, DiffReport, OutputFormat};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "catalog-diff")]
#[command(about = "Report stream and field changes between two catalog snapshots")]
struct Cli {
    /// Path to the old catalog (JSON)
    #[arg(long)]
    old: PathBuf,

    /// Path to the new catalog (JSON)
    #[arg(long)]
    new: PathBuf,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Path to a config file
    #[arg(short, long)]
    config: Option<String>,

    /// Exit with status 1 when the catalogs differ
    #[arg(long)]
    fail_on_change: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config =
        DiffConfig::load_from(cli.config.as_deref()).context("failed to load configuration")?;

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?config, "loaded configuration");

    let old = Catalog::from_path(&cli.old)
        .with_context(|| format!("failed to read {}", cli.old.display()))?;
    let new = Catalog::from_path(&cli.new)
        .with_context(|| format!("failed to read {}", cli.new.display()))?;
    info!(
        old_streams = old.streams.len(),
        new_streams = new.streams.len(),
        "comparing catalogs"
    );

    let report = DiffReport::build(&old, &new)?;

    match cli.format.unwrap_or(config.output.format) {
        OutputFormat::Json if config.output.pretty => {
            println!("{}", serde_json::to_string_pretty(&report)?)
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&report)?),
        OutputFormat::Text => print!("{}", report.text(config.output.include_checksums)),
    }

    let fail_on_change = cli.fail_on_change || config.diff.fail_on_change;
    if fail_on_change && report.has_changes() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
