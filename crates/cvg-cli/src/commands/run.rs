use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use cvg_core::{CvgError, ErrorInfo, ExperimentContext};
use cvg_exp::{Experiment, ExperimentController};
use cvg_plot::SvgRenderer;
use cvg_runner::ProcessRunner;
use tracing::info;

use super::lab_config;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Logic program under study.
    pub program: PathBuf,
    /// Number of queries the program asks.
    pub num_queries: usize,
    /// Model count believed sufficient for near-exact answers.
    pub estimated_models: u64,
    /// Lab configuration (YAML).
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Output root, overriding the configuration.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Engine executable, overriding the configuration.
    #[arg(long)]
    pub engine: Option<PathBuf>,
}

/// Runs one experiment end to end and prints the AUEC per query.
pub fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let mut config = lab_config(args.config.as_deref())?;
    if let Some(out) = &args.out {
        config.output_root = out.clone();
    }
    if let Some(engine) = &args.engine {
        config.engine.program = engine.clone();
    }

    if !args.program.is_file() {
        return Err(CvgError::Setup(
            ErrorInfo::new("program-missing", "program file does not exist")
                .with_context("path", args.program.display().to_string()),
        )
        .into());
    }
    let program_text = fs::read_to_string(&args.program).map_err(|err| {
        CvgError::Setup(
            ErrorInfo::new("program-read", err.to_string())
                .with_context("path", args.program.display().to_string()),
        )
    })?;

    let ctx = ExperimentContext::for_program(config.output_root.clone(), &args.program)?;
    info!(program = %args.program.display(), experiment = %ctx.name, "running experiment");
    let runner = ProcessRunner::new(config.engine.clone(), ctx.clone(), args.num_queries);
    let renderer = SvgRenderer::default();
    let experiment = Experiment {
        ctx,
        program_text,
        num_queries: args.num_queries,
        estimated_models: args.estimated_models,
    };

    let outcome = ExperimentController::new(&config, &runner, &renderer).run(&experiment)?;
    match &outcome.metrics {
        Some(metrics) => {
            println!("AUEC values for each query:");
            for (idx, auec) in metrics.auec_values().iter().enumerate() {
                println!("Query {}: AUEC (Relative Error vs nmodels) = {auec}", idx + 1);
            }
        }
        None => println!("No results to report for {}", experiment.ctx.name),
    }
    Ok(())
}
