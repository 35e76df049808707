use cvg_core::Budget;
use serde::Serialize;

/// Error thresholds probed for every query, loosest first.
pub const DEFAULT_THRESHOLDS: [f64; 9] =
    [0.2, 0.08, 0.03, 0.01, 0.008, 0.005, 0.002, 0.001, 0.0002];

/// Smallest budget after which a query stays below one threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConvergencePoint {
    /// Relative error bound.
    pub threshold: f64,
    /// Budget at which the bound is reached for good, `None` if never.
    pub budget: Option<Budget>,
}

/// Per-query map from thresholds (in probe order) to convergence budgets.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ConvergenceThresholdMap {
    /// One entry per probed threshold.
    pub points: Vec<ConvergencePoint>,
}

impl ConvergenceThresholdMap {
    /// Convergence budget for `threshold`; `None` if the threshold was not
    /// probed or never reached.
    pub fn budget_for(&self, threshold: f64) -> Option<Budget> {
        self.points
            .iter()
            .find(|point| point.threshold == threshold)
            .and_then(|point| point.budget)
    }

    /// Number of thresholds that were reached.
    pub fn reached(&self) -> usize {
        self.points
            .iter()
            .filter(|point| point.budget.is_some())
            .count()
    }
}

/// Index of the first error that is below `threshold` and stays below it
/// for every later budget.
///
/// NaN entries are gaps left by failed or unparsable trials: they can not
/// be the converging index, and they do not break convergence either.
/// Every candidate re-checks its whole suffix.
pub fn first_stable_index(rel_errors: &[f64], threshold: f64) -> Option<usize> {
    (0..rel_errors.len()).find(|&idx| {
        let value = rel_errors[idx];
        !value.is_nan()
            && value < threshold
            && rel_errors[idx..]
                .iter()
                .filter(|err| !err.is_nan())
                .all(|&err| err < threshold)
    })
}

/// Evaluates every threshold against one query's relative error curve.
pub fn convergence_map(
    budgets: &[Budget],
    rel_errors: &[f64],
    thresholds: &[f64],
) -> ConvergenceThresholdMap {
    let points = thresholds
        .iter()
        .map(|&threshold| ConvergencePoint {
            threshold,
            budget: first_stable_index(rel_errors, threshold)
                .and_then(|idx| budgets.get(idx).copied()),
        })
        .collect();
    ConvergenceThresholdMap { points }
}
