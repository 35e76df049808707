use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use cvg_core::serde::to_canonical_json_bytes;
use cvg_core::{CvgError, ErrorInfo, ExperimentContext};
use cvg_exp::ExperimentCache;
use cvg_metrics::compute_metrics;

use super::lab_config;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Experiment name (the program's file stem).
    pub name: String,
    /// Number of queries in the program.
    pub num_queries: usize,
    /// Output root holding the experiment cache.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Lab configuration (YAML).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Prints the canonical JSON metrics of a cached experiment.
pub fn run(args: &ReportArgs) -> Result<(), Box<dyn Error>> {
    let config = lab_config(args.config.as_deref())?;
    let root = args.out.clone().unwrap_or_else(|| config.output_root.clone());
    let ctx = ExperimentContext::new(root, args.name.as_str());
    let cache = ExperimentCache::new(&ctx);
    let cached = cache.load()?.ok_or_else(|| {
        CvgError::Cache(
            ErrorInfo::new("cache-missing", "experiment has not been run")
                .with_context("path", cache.path().display().to_string())
                .with_hint("run `cvg run` first"),
        )
    })?;
    let metrics = compute_metrics(&cached.history, args.num_queries, &config.thresholds)
        .ok_or_else(|| {
            CvgError::Metrics(
                ErrorInfo::new("no-ground-truth", "cache holds no trial results")
                    .with_context("experiment", ctx.name.clone()),
            )
        })?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&to_canonical_json_bytes(&metrics)?)?;
    writeln!(stdout)?;
    Ok(())
}
