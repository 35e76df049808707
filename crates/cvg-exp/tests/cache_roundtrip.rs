use cvg_core::{CvgError, ExperimentContext, TrialHistory, TrialLabel, TrialResult};
use cvg_exp::{ExperimentCache, CACHE_SCHEMA_VERSION};

fn history() -> TrialHistory {
    let mut history = TrialHistory::new(vec![2, 5, 12]);
    history.record(TrialResult::new(
        TrialLabel::Exact,
        vec![0.125, f64::NAN],
        12.75,
        301.5,
    ));
    history.record(TrialResult::new(
        TrialLabel::Budget(2),
        vec![0.1, 0.30000000000000004],
        0.013,
        4.0,
    ));
    history.record(TrialResult::new(TrialLabel::Budget(12), vec![], 0.2, 0.0));
    history
}

#[test]
fn missing_cache_loads_as_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = ExperimentCache::new(&ExperimentContext::new(dir.path(), "coins"));
    assert!(cache.load().expect("load").is_none());
}

#[test]
fn save_then_load_preserves_every_bit() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = ExperimentContext::new(dir.path(), "coins");
    let cache = ExperimentCache::new(&ctx);
    let original = history();
    cache.save(&original, "coin(1).").expect("save");
    assert_eq!(cache.path(), &ctx.cache_path());

    let restored = cache.load().expect("load").expect("cached");
    assert!(restored.matches_program("coin(1)."));
    assert!(!restored.matches_program("coin(2)."));
    assert_eq!(restored.history.schedule, original.schedule);
    assert_eq!(restored.history.trials.len(), original.trials.len());
    for (left, right) in restored.history.trials.iter().zip(&original.trials) {
        assert_eq!(left.label, right.label);
        assert_eq!(left.runtime_seconds.to_bits(), right.runtime_seconds.to_bits());
        assert_eq!(left.peak_memory_mb.to_bits(), right.peak_memory_mb.to_bits());
        let bits = |values: &[f64]| values.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&left.probabilities), bits(&right.probabilities));
    }
    assert!(restored.history.trials[0].probabilities[1].is_nan());
}

#[test]
fn saving_again_replaces_the_previous_state() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = ExperimentCache::new(&ExperimentContext::new(dir.path(), "coins"));
    cache.save(&history(), "a.").expect("first");
    let shorter = TrialHistory::new(vec![2]);
    cache.save(&shorter, "b.").expect("second");
    let restored = cache.load().expect("load").expect("cached");
    assert_eq!(restored.history, shorter);
    assert!(restored.matches_program("b."));
}

#[test]
fn corrupt_cache_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = ExperimentContext::new(dir.path(), "coins");
    std::fs::write(ctx.cache_path(), b"\x01\x02not bincode").expect("write");
    let err = ExperimentCache::new(&ctx).load().expect_err("corrupt");
    assert!(matches!(err, CvgError::Cache(_)));
    assert!(err.is_fatal());
}

#[test]
fn foreign_schema_version_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = ExperimentContext::new(dir.path(), "coins");
    let original = history();
    let envelope = (
        CACHE_SCHEMA_VERSION + 1,
        "0".repeat(64),
        original.trials.clone(),
        original.schedule.clone(),
    );
    let bytes = bincode::serialize(&envelope).expect("encode");
    std::fs::write(ctx.cache_path(), bytes).expect("write");

    let err = ExperimentCache::new(&ctx).load().expect_err("foreign schema");
    assert!(matches!(err, CvgError::Cache(_)));
    assert!(err.is_fatal());
    let info = err.info();
    assert_eq!(info.code, "cache-schema");
    assert_eq!(
        info.context.get("found"),
        Some(&(CACHE_SCHEMA_VERSION + 1).to_string())
    );
    assert!(info.hint.as_deref().unwrap_or_default().contains("delete the cache"));
    assert!(ctx.cache_path().exists());
}
