//! Bout CLI
//!
//! Reconstructs bout statistics from a JSON request file and prints or saves
//! the resulting `BoutStats` document.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bout_core::{reconstruct, BoutStats, ReconstructConfig, ReconstructRequest};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(name = "bout")]
#[command(
    about = "Reconstruct statistics for a scored bout from its event log",
    long_about = None
)]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Reconstruct statistics from a request file
    Reconstruct {
        /// Input request JSON file path
        #[arg(long)]
        r#in: PathBuf,

        /// Output file path (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Config JSON file; overrides any config embedded in the request
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pretty-print the output JSON
        #[arg(long, default_value = "false")]
        pretty: bool,

        /// Print the SHA-256 fingerprint of the result to stderr
        #[arg(long, default_value = "false")]
        fingerprint: bool,
    },

    /// Write the JSON Schema of the output document
    Schema {
        /// Output file path (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Config precedence: `--config` file, then the request's own config, then
/// `BOUT_RECONSTRUCT_CONFIG_PATH`, then defaults.
pub fn resolve_config(
    config_path: Option<&Path>,
    embedded: Option<ReconstructConfig>,
) -> Result<ReconstructConfig> {
    if let Some(path) = config_path {
        return ReconstructConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()));
    }
    if let Some(config) = embedded {
        return Ok(config);
    }
    Ok(ReconstructConfig::from_env()?)
}

/// Read a request file and reconstruct it.
pub fn reconstruct_file(input: &Path, config_path: Option<&Path>) -> Result<BoutStats> {
    let request_json =
        fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let request = ReconstructRequest::from_json(&request_json).map_err(anyhow::Error::msg)?;
    let (snapshot, embedded) = request.into_parts();
    let config = resolve_config(config_path, embedded)?;

    debug!(?config, "resolved config");
    let stats = reconstruct(&snapshot, &config);
    info!(
        match_id = %stats.match_id,
        effective_events = stats.summary.effective_events,
        diagnostics = stats.diagnostics.len(),
        "reconstructed bout"
    );
    Ok(stats)
}

pub fn render(stats: &BoutStats, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(stats)?
    } else {
        serde_json::to_string(stats)?
    };
    Ok(json)
}

fn emit(out: Option<&Path>, contents: &str) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Saved to: {}", path.display());
        }
        None => println!("{contents}"),
    }
    Ok(())
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Reconstruct {
            r#in,
            out,
            config,
            pretty,
            fingerprint,
        } => {
            let stats = reconstruct_file(&r#in, config.as_deref())?;
            if fingerprint {
                eprintln!("fingerprint: {}", stats.fingerprint()?);
            }
            emit(out.as_deref(), &render(&stats, pretty)?)?;
        }
        Commands::Schema { out } => {
            let schema = bout_core::bout_stats_schema().map_err(anyhow::Error::msg)?;
            emit(out.as_deref(), &schema)?;
        }
    }
    Ok(())
}
