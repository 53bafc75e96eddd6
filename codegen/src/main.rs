//! Pool generator binary.
//!
//! Loads a finalized-or-raw registry snapshot and the parameter-name
//! metadata from JSON, runs generation and writes one typed module per
//! entity into the output directory.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use poolgen_ir::{AstEntry, AstIndex, Registry};
use poolgen_lib::PoolGenerator;

#[derive(Parser)]
#[command(name = "poolgen")]
#[command(about = "Generate typed pool modules from an entity registry snapshot")]
struct Args {
    /// Registry snapshot (JSON)
    #[arg(short, long)]
    registry: PathBuf,

    /// Method parameter metadata (JSON), as produced by the
    /// static-analysis pass
    #[arg(short, long)]
    ast_data: Option<PathBuf>,

    /// Output directory for the generated modules
    #[arg(short, long)]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let raw = fs::read_to_string(&args.registry)
        .with_context(|| format!("cannot read {}", args.registry.display()))?;
    let mut registry: Registry =
        serde_json::from_str(&raw).context("malformed registry snapshot")?;
    registry.finalize().context("registry finalization failed")?;
    info!(entities = registry.entities.len(), "loaded registry snapshot");

    let ast = match &args.ast_data {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            let entries: Vec<AstEntry> =
                serde_json::from_str(&raw).context("malformed method metadata")?;
            AstIndex::from_entries(entries)
        }
        None => AstIndex::new(),
    };
    info!(methods = ast.len(), "loaded method metadata");

    let report = PoolGenerator::new(&registry, &ast).generate();
    report
        .code
        .write_to(&args.output)
        .context("writing generated modules")?;
    info!(
        files = report.code.files.len(),
        output = %args.output.display(),
        "generation finished"
    );

    if !report.is_success() {
        anyhow::bail!("{} entity(ies) failed to generate", report.failures.len());
    }
    Ok(())
}
