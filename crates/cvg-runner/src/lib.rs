#![deny(missing_docs)]
#![doc = "Supervised execution of the external inference engine."]

/// Trial program rewriting.
pub mod directive;
pub mod memory;
/// Engine output parsing.
pub mod parse;
/// Child process supervision.
pub mod process;

pub use directive::{directive_line, rewrite_program, write_trial_program};
pub use memory::{MemoryPeak, MemorySampler};
pub use parse::{combined_output, extract_probabilities, PROBABILITY_PREFIX};
pub use process::{EngineSpec, ProcessRunner, TrialEngine};
