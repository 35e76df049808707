use cvg_core::{ExperimentContext, PlotKind, TrialHistory, TrialLabel, TrialResult};
use cvg_metrics::{compute_metrics, DEFAULT_THRESHOLDS};
use cvg_plot::{Renderer, SvgRenderer};

fn metrics() -> cvg_metrics::ExperimentMetrics {
    let mut history = TrialHistory::new(vec![2, 4, 8]);
    history.record(TrialResult::new(TrialLabel::Exact, vec![0.5, 0.25], 3.0, 20.0));
    history.record(TrialResult::new(TrialLabel::Budget(2), vec![0.3, 0.2], 0.1, 5.0));
    history.record(TrialResult::new(TrialLabel::Budget(4), vec![0.4, 0.24], 0.2, 6.0));
    history.record(TrialResult::new(TrialLabel::Budget(8), vec![0.5, 0.25], 0.4, 7.0));
    compute_metrics(&history, 2, &DEFAULT_THRESHOLDS).expect("ground truth")
}

#[test]
fn renderer_writes_every_family_and_the_gallery() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = ExperimentContext::new(dir.path(), "coins");
    ctx.prepare().expect("prepare");

    let written = SvgRenderer::default()
        .render(&ctx, &metrics())
        .expect("render");
    // five per-query files plus two gallery copies, twice, plus runtime
    assert_eq!(written.len(), 15);
    assert!(written.iter().all(|path| path.exists()));

    assert!(ctx.plot_dir(PlotKind::ExactVsApprox).join("query_2.svg").exists());
    assert!(ctx
        .plot_dir(PlotKind::Spheres)
        .join("query_1_side_by_side.svg")
        .exists());
    assert!(ctx
        .plot_dir(PlotKind::Runtime)
        .join("runtime_vs_nmodels.svg")
        .exists());
    assert!(ctx.gallery_dir().join("coins_eva0.svg").exists());
    assert!(ctx.gallery_dir().join("coins_rel1.svg").exists());
}

#[test]
fn rendering_twice_is_byte_identical() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = ExperimentContext::new(dir.path(), "coins");
    let renderer = SvgRenderer::default();
    let first = renderer.render(&ctx, &metrics()).expect("first");
    let snapshot: Vec<Vec<u8>> = first
        .iter()
        .map(|path| std::fs::read(path).expect("read"))
        .collect();
    let second = renderer.render(&ctx, &metrics()).expect("second");
    assert_eq!(first, second);
    for (path, bytes) in second.iter().zip(snapshot) {
        assert_eq!(std::fs::read(path).expect("reread"), bytes);
    }
}
