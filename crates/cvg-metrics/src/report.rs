use cvg_core::{Budget, TrialHistory, TrialResult};
use serde::Serialize;
use tracing::info;

use crate::auec::auec;
use crate::convergence::{convergence_map, ConvergenceThresholdMap};
use crate::error_curve::{absolute_errors, relative_errors};

/// Where the per-query ground truth came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundTruthSource {
    /// The exact trial.
    Exact,
    /// The largest-budget approximation, treated as if exact. Its own
    /// relative error is therefore zero by construction.
    LastApproximation,
}

/// Error statistics for one query across the schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryMetrics {
    /// Zero-based query index.
    pub query: usize,
    /// Ground truth probability, NaN if unavailable.
    pub ground_truth: f64,
    /// Budgets of the recorded approximate trials.
    pub budgets: Vec<Budget>,
    /// Approximate probability per budget.
    pub probabilities: Vec<f64>,
    /// Absolute error per budget.
    pub abs_errors: Vec<f64>,
    /// Relative error per budget.
    pub rel_errors: Vec<f64>,
    /// Area under the rescaled error curve over log-budget, NaN when fewer
    /// than two points are usable.
    pub auec: f64,
    /// Budgets needed to stay under each threshold.
    pub convergence: ConvergenceThresholdMap,
}

impl QueryMetrics {
    /// Derives the statistics of `query` from the approximate trials.
    pub fn derive(
        query: usize,
        ground_truth: f64,
        approximations: &[&TrialResult],
        thresholds: &[f64],
    ) -> Self {
        let budgets: Vec<Budget> = approximations
            .iter()
            .filter_map(|trial| trial.label.budget())
            .collect();
        let probabilities: Vec<f64> = approximations
            .iter()
            .map(|trial| trial.probability(query))
            .collect();
        let abs_errors = absolute_errors(ground_truth, &probabilities);
        let rel_errors = relative_errors(ground_truth, &abs_errors);
        let auec = auec(&budgets, &rel_errors);
        let convergence = convergence_map(&budgets, &rel_errors, thresholds);
        Self {
            query,
            ground_truth,
            budgets,
            probabilities,
            abs_errors,
            rel_errors,
            auec,
            convergence,
        }
    }
}

/// Everything the rendering stage consumes for one experiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentMetrics {
    /// Ground truth provenance.
    pub source: GroundTruthSource,
    /// Scheduled budgets, including ones whose trial failed.
    pub schedule: Vec<Budget>,
    /// Budgets of the recorded approximate trials.
    pub budgets: Vec<Budget>,
    /// Runtime per recorded budget, in seconds.
    pub runtimes: Vec<f64>,
    /// Peak resident memory per recorded budget, in MiB.
    pub peak_memory_mb: Vec<f64>,
    /// Per-query statistics, indexed by query.
    pub queries: Vec<QueryMetrics>,
}

impl ExperimentMetrics {
    /// AUEC values in query order.
    pub fn auec_values(&self) -> Vec<f64> {
        self.queries.iter().map(|query| query.auec).collect()
    }
}

/// Derives the metrics for every query of an experiment.
///
/// Returns `None` when there is neither an exact trial nor any approximate
/// trial to serve as ground truth.
pub fn compute_metrics(
    history: &TrialHistory,
    num_queries: usize,
    thresholds: &[f64],
) -> Option<ExperimentMetrics> {
    let approximations: Vec<&TrialResult> = history.approximations().collect();
    let (source, truth) = match history.exact() {
        Some(exact) => (GroundTruthSource::Exact, exact),
        None => {
            let last = approximations.last().copied()?;
            info!(
                budget = %last.label,
                probabilities = ?last.probabilities,
                "using last approximation as ground truth"
            );
            (GroundTruthSource::LastApproximation, last)
        }
    };

    let queries: Vec<QueryMetrics> = (0..num_queries)
        .map(|query| {
            let metrics =
                QueryMetrics::derive(query, truth.probability(query), &approximations, thresholds);
            log_query(&metrics);
            metrics
        })
        .collect();

    Some(ExperimentMetrics {
        source,
        schedule: history.schedule.clone(),
        budgets: approximations
            .iter()
            .filter_map(|trial| trial.label.budget())
            .collect(),
        runtimes: approximations
            .iter()
            .map(|trial| trial.runtime_seconds)
            .collect(),
        peak_memory_mb: approximations
            .iter()
            .map(|trial| trial.peak_memory_mb)
            .collect(),
        queries,
    })
}

fn log_query(metrics: &QueryMetrics) {
    let query = metrics.query + 1;
    if metrics.auec.is_nan() {
        info!(query, "AUEC cannot be computed, too few valid points");
    } else {
        info!(query, auec = metrics.auec, "AUEC (relative error vs nmodels)");
    }
    info!(
        query,
        reached = metrics.convergence.reached(),
        probed = metrics.convergence.points.len(),
        "convergence thresholds reached"
    );
    for point in &metrics.convergence.points {
        match point.budget {
            Some(budget) => info!(
                query,
                threshold = point.threshold,
                nmodels = budget,
                "relative error stays below threshold"
            ),
            None => info!(
                query,
                threshold = point.threshold,
                "relative error never settles below threshold"
            ),
        }
    }
}
