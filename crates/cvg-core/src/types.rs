use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Sample-size budget handed to the approximate engine (`nmodels`).
pub type Budget = u64;

/// Smallest budget the approximate engine accepts.
pub const MIN_BUDGET: Budget = 2;

/// Identifies which engine configuration produced a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrialLabel {
    /// Exact inference, used as ground truth.
    Exact,
    /// Approximate inference at the given budget.
    Budget(Budget),
}

impl TrialLabel {
    /// Returns the budget for approximate trials.
    pub fn budget(&self) -> Option<Budget> {
        match self {
            TrialLabel::Exact => None,
            TrialLabel::Budget(budget) => Some(*budget),
        }
    }

    /// Returns true for the exact trial.
    pub fn is_exact(&self) -> bool {
        matches!(self, TrialLabel::Exact)
    }
}

impl Display for TrialLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrialLabel::Exact => write!(f, "exact"),
            TrialLabel::Budget(budget) => write!(f, "{budget}"),
        }
    }
}

/// Outcome of one engine invocation. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    /// Engine configuration that produced the trial.
    pub label: TrialLabel,
    /// Query probabilities in order of appearance; at most `num_queries`
    /// entries, NaN where the engine printed something unparsable.
    pub probabilities: Vec<f64>,
    /// Wall-clock duration of the trial in seconds.
    pub runtime_seconds: f64,
    /// Peak resident memory observed while the engine ran, in MiB.
    pub peak_memory_mb: f64,
}

impl TrialResult {
    /// Creates a trial result, clamping resource figures to be non-negative.
    pub fn new(
        label: TrialLabel,
        probabilities: Vec<f64>,
        runtime_seconds: f64,
        peak_memory_mb: f64,
    ) -> Self {
        Self {
            label,
            probabilities,
            runtime_seconds: runtime_seconds.max(0.0),
            peak_memory_mb: peak_memory_mb.max(0.0),
        }
    }

    /// Probability for `query`, NaN when the engine never reported it.
    pub fn probability(&self, query: usize) -> f64 {
        self.probabilities.get(query).copied().unwrap_or(f64::NAN)
    }
}

/// Full trial history of an experiment together with the schedule that
/// produced it.
///
/// The exact trial, when present, is always first; approximate trials follow
/// in execution order. Failed trials leave no entry, so the number of
/// approximate trials may be smaller than the schedule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrialHistory {
    /// Recorded trials.
    pub trials: Vec<TrialResult>,
    /// Budgets that were scheduled, strictly increasing.
    pub schedule: Vec<Budget>,
}

impl TrialHistory {
    /// Creates an empty history for the provided schedule.
    pub fn new(schedule: Vec<Budget>) -> Self {
        Self {
            trials: Vec::new(),
            schedule,
        }
    }

    /// Returns the exact trial if one was recorded.
    pub fn exact(&self) -> Option<&TrialResult> {
        self.trials.iter().find(|trial| trial.label.is_exact())
    }

    /// Iterates over approximate trials in execution order.
    pub fn approximations(&self) -> impl Iterator<Item = &TrialResult> + '_ {
        self.trials.iter().filter(|trial| !trial.label.is_exact())
    }

    /// Records a trial, keeping the exact trial at the front.
    pub fn record(&mut self, trial: TrialResult) {
        if trial.label.is_exact() {
            self.trials.insert(0, trial);
        } else {
            self.trials.push(trial);
        }
    }
}
