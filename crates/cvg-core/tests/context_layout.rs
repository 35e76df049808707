use std::path::Path;

use cvg_core::{ExperimentContext, PlotKind, TrialLabel};

#[test]
fn name_is_program_stem() {
    let ctx = ExperimentContext::for_program("out", Path::new("experiments/smoke.lp")).unwrap();
    assert_eq!(ctx.name, "smoke");
    assert_eq!(ctx.cache_path(), Path::new("out/results_smoke.bin"));
}

#[test]
fn trial_paths_are_scoped_per_label() {
    let ctx = ExperimentContext::new("out", "mango");
    assert_eq!(
        ctx.trial_program_path(TrialLabel::Exact),
        Path::new("out/mango/trials/test_exact.lp")
    );
    assert_eq!(
        ctx.trial_program_path(TrialLabel::Budget(128)),
        Path::new("out/mango/trials/test_128.lp")
    );
}

#[test]
fn prepare_is_idempotent_and_keeps_contents() {
    let temp = tempfile::tempdir().unwrap();
    let ctx = ExperimentContext::new(temp.path(), "smoke");
    ctx.prepare().unwrap();
    let marker = ctx.plot_dir(PlotKind::Runtime).join("keep.svg");
    std::fs::write(&marker, "<svg/>").unwrap();

    ctx.prepare().unwrap();
    assert!(marker.exists());
    for kind in PlotKind::ALL {
        assert!(ctx.plot_dir(kind).is_dir());
    }
    assert!(ctx.gallery_dir().is_dir());
    assert!(ctx.trials_dir().is_dir());
}

#[test]
fn prepare_fails_when_root_is_a_file() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("occupied");
    std::fs::write(&root, "not a directory").unwrap();
    let ctx = ExperimentContext::new(&root, "smoke");
    let err = ctx.prepare().unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(err.info().code, "create-dir");
}
