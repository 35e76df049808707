#![deny(missing_docs)]
#![doc = "Budget schedules, resumable experiment caches and the controller that ties trials, metrics and figures together."]

/// Persisted trial histories.
pub mod cache;
/// Lab configuration loading.
pub mod config;
/// Experiment state machine.
pub mod controller;
/// Budget schedule generation.
pub mod schedule;

pub use cache::{CachedExperiment, ExperimentCache, CACHE_SCHEMA_VERSION};
pub use config::{load_config, parse_config, LabConfig, SkipExactPolicy};
pub use controller::{
    write_report, ControllerState, Experiment, ExperimentController, ExperimentOutcome,
};
pub use schedule::{generate_schedule, ScheduleSpec};
