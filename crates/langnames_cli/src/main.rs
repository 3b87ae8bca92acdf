//! langnames - generate localized locale display names
//!
//! Reads YAML `lang/` and `region/` bundles plus `aliases.yaml` from a source directory,
//! builds the name table of every display locale and writes one JSON file per locale that
//! has entries beyond what it inherits, plus `_meta.json`.

mod config;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::LangnamesConfig;
use langnames::{generate_all, BundleSet, LocaleInventory};

/// Generate localized locale display names
#[derive(Parser, Debug)]
#[command(name = "langnames")]
#[command(about = "Generate localized locale display names from YAML bundles")]
#[command(version)]
struct Args {
    /// Configuration file or directory containing langnames.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source directory (overrides [source].dir)
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Output directory (overrides [output].dir)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Generate display locales one at a time
    #[arg(long)]
    serial: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = LangnamesConfig::load_or_default(args.config.as_deref())?;
    if let Some(source) = args.source {
        config.source.dir = source;
    }
    if let Some(out) = args.out {
        config.output.dir = out;
    }
    if args.serial {
        config.run.parallel = false;
    }
    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    tracing::info!("Reading bundles from {}", config.source.dir.display());

    let inventory = LocaleInventory::scan(&config.source.dir)
        .with_context(|| format!("Failed to scan {}", config.source.dir.display()))?;
    let bundles = BundleSet::load_dir(&config.source.dir)
        .with_context(|| format!("Failed to load bundles from {}", config.source.dir.display()))?;

    let result = generate_all(&inventory, &bundles, &config.run.to_options())
        .context("Generation aborted")?;

    let written = output::write_output(&config.output.dir, &result, config.output.pretty)?;
    tracing::info!(
        "Wrote {} files to {}",
        written,
        config.output.dir.display()
    );

    Ok(())
}
