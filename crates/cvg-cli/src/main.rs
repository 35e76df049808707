use std::error::Error;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    report::{self, ReportArgs},
    run::{self, RunArgs},
    schedule::{self, ScheduleArgs},
};

mod commands;

const CRATES: [&str; 6] = [
    "cvg", "cvg_core", "cvg_runner", "cvg_metrics", "cvg_exp", "cvg_plot",
];

/// Convergence experiments for budgeted approximate inference.
#[derive(Parser, Debug)]
#[command(name = "cvg", version, about)]
struct Cli {
    /// More output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only report warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an experiment, or resume it from its cache, then render figures.
    Run(RunArgs),
    /// Print the budget schedule for an estimated model count.
    Schedule(ScheduleArgs),
    /// Recompute metrics from a cached experiment without running anything.
    Report(ReportArgs),
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let directives = CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",");
    // Logs go to stderr so JSON on stdout stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("warn,{directives}")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    match cli.command {
        Command::Run(args) => run::run(&args),
        Command::Schedule(args) => schedule::run(&args),
        Command::Report(args) => report::run(&args),
    }
}
