#![deny(missing_docs)]
#![doc = "Core data model and shared plumbing for convergence experiments."]

pub mod context;
pub mod errors;
/// Stable content hashing.
pub mod hash;
/// Canonical JSON helpers.
pub mod serde;
mod types;

pub use context::{ExperimentContext, PlotKind};
pub use errors::{CvgError, ErrorInfo};
pub use hash::program_hash;
pub use types::{Budget, TrialHistory, TrialLabel, TrialResult, MIN_BUDGET};
