use cvg_core::errors::{CvgError, ErrorInfo};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("experiment", "smoke")
        .with_context("budget", "16")
}

#[test]
fn setup_errors_are_fatal() {
    let err = CvgError::Setup(sample_info("S001", "permission denied"));
    assert_eq!(err.info().code, "S001");
    assert!(err.is_fatal());
}

#[test]
fn trial_errors_are_recoverable() {
    let err = CvgError::Trial(sample_info("T001", "spawn failed"));
    assert!(!err.is_fatal());
    assert!(err.info().context.contains_key("budget"));
}

#[test]
fn parse_and_metric_errors_are_recoverable() {
    assert!(!CvgError::Parse(sample_info("P001", "bad float")).is_fatal());
    assert!(!CvgError::Metrics(sample_info("M001", "too few points")).is_fatal());
}

#[test]
fn display_includes_context_and_hint() {
    let err = CvgError::Cache(sample_info("C001", "truncated").with_hint("delete the cache file"));
    let rendered = err.to_string();
    assert!(rendered.starts_with("cache error: truncated (code: C001)"));
    assert!(rendered.contains("budget=16, experiment=smoke"));
    assert!(rendered.ends_with("hint: delete the cache file"));
}
