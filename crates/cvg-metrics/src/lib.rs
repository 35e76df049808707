#![deny(missing_docs)]
#![doc = "Accuracy versus cost metrics for budgeted approximate inference."]

/// Area under the error curve.
pub mod auec;
/// Threshold convergence detection.
pub mod convergence;
/// Absolute and relative error curves.
pub mod error_curve;
/// Per-experiment metric assembly.
pub mod report;

pub use auec::{auec, rescale_error, trapezoid};
pub use convergence::{
    convergence_map, first_stable_index, ConvergencePoint, ConvergenceThresholdMap,
    DEFAULT_THRESHOLDS,
};
pub use error_curve::{absolute_errors, reference_error, relative_errors, REL_ERROR_FLOOR};
pub use report::{compute_metrics, ExperimentMetrics, GroundTruthSource, QueryMetrics};
