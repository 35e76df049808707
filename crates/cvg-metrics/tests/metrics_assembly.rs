use cvg_core::{TrialHistory, TrialLabel, TrialResult};
use cvg_metrics::{compute_metrics, GroundTruthSource, DEFAULT_THRESHOLDS};

fn approx(budget: u64, probs: &[f64], runtime: f64) -> TrialResult {
    TrialResult::new(TrialLabel::Budget(budget), probs.to_vec(), runtime, 10.0)
}

#[test]
fn exact_trial_is_ground_truth() {
    let mut history = TrialHistory::new(vec![2, 4, 8]);
    history.record(TrialResult::new(TrialLabel::Exact, vec![0.5, 0.2], 9.0, 50.0));
    history.record(approx(2, &[0.3, 0.1], 0.1));
    history.record(approx(4, &[0.4, 0.15], 0.2));
    history.record(approx(8, &[0.5, 0.2], 0.4));

    let metrics = compute_metrics(&history, 2, &DEFAULT_THRESHOLDS).unwrap();
    assert_eq!(metrics.source, GroundTruthSource::Exact);
    assert_eq!(metrics.budgets, vec![2, 4, 8]);
    assert_eq!(metrics.runtimes, vec![0.1, 0.2, 0.4]);
    assert_eq!(metrics.queries.len(), 2);
    assert_eq!(metrics.queries[0].ground_truth, 0.5);
    assert!((metrics.queries[0].rel_errors[0] - 1.0).abs() < 1e-12);
    assert!(metrics.queries[0].auec > 0.0);
}

#[test]
fn last_approximation_substitutes_for_exact() {
    let mut history = TrialHistory::new(vec![2, 4, 8]);
    history.record(approx(2, &[0.1], 0.1));
    history.record(approx(4, &[0.3], 0.2));
    history.record(approx(8, &[0.35], 0.3));

    let metrics = compute_metrics(&history, 1, &DEFAULT_THRESHOLDS).unwrap();
    assert_eq!(metrics.source, GroundTruthSource::LastApproximation);
    let query = &metrics.queries[0];
    assert_eq!(query.ground_truth, 0.35);
    assert_eq!(query.rel_errors[2], 0.0);
    assert_eq!(query.convergence.budget_for(0.0002), Some(8));
}

#[test]
fn failed_trials_leave_gaps_not_panics() {
    let mut history = TrialHistory::new(vec![2, 4, 8, 16]);
    history.record(TrialResult::new(TrialLabel::Exact, vec![0.5, 0.5, 0.5], 1.0, 1.0));
    history.record(approx(2, &[0.1], 0.1));
    // budget 4 failed entirely and left no entry
    history.record(approx(8, &[0.45, 0.4], 0.3));
    history.record(approx(16, &[], 0.3));

    let metrics = compute_metrics(&history, 3, &DEFAULT_THRESHOLDS).unwrap();
    assert_eq!(metrics.schedule, vec![2, 4, 8, 16]);
    assert_eq!(metrics.budgets, vec![2, 8, 16]);
    let second = &metrics.queries[1];
    assert!(second.probabilities[0].is_nan());
    assert_eq!(second.probabilities[1], 0.4);
    assert!(second.auec.is_nan());
    let third = &metrics.queries[2];
    assert!(third.rel_errors.iter().all(|err| err.is_nan()));
    assert_eq!(third.convergence.reached(), 0);
}

#[test]
fn exact_only_history_has_empty_curves() {
    let mut history = TrialHistory::new(vec![2]);
    history.record(TrialResult::new(TrialLabel::Exact, vec![0.5], 1.0, 1.0));
    let metrics = compute_metrics(&history, 1, &DEFAULT_THRESHOLDS).unwrap();
    assert!(metrics.queries[0].budgets.is_empty());
    assert!(metrics.queries[0].auec.is_nan());
}

#[test]
fn nothing_to_compare_against() {
    let history = TrialHistory::new(vec![2, 4]);
    assert!(compute_metrics(&history, 2, &DEFAULT_THRESHOLDS).is_none());
}
