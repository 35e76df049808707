use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use cvg_exp::generate_schedule;

use super::lab_config;

#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Model count believed sufficient for near-exact answers.
    pub estimated_models: u64,
    /// Lab configuration (YAML).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Prints the schedule as a JSON array.
pub fn run(args: &ScheduleArgs) -> Result<(), Box<dyn Error>> {
    let config = lab_config(args.config.as_deref())?;
    let schedule = generate_schedule(args.estimated_models, &config.schedule);
    println!("{}", serde_json::to_string(&schedule)?);
    Ok(())
}
