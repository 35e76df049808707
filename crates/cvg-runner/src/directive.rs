use std::fs;
use std::path::PathBuf;

use cvg_core::{CvgError, ErrorInfo, ExperimentContext, TrialLabel};

/// Inference directive appended to the program for one trial.
pub fn directive_line(label: TrialLabel) -> String {
    match label {
        TrialLabel::Exact => "#inference exact.".to_string(),
        TrialLabel::Budget(budget) => format!("#inference aseo, nmodels={budget}."),
    }
}

/// Program text handed to the engine for one trial.
pub fn rewrite_program(program_text: &str, label: TrialLabel) -> String {
    format!("{program_text}\n{}\n", directive_line(label))
}

/// Writes the rewritten program to the trial's own path and returns it.
pub fn write_trial_program(
    ctx: &ExperimentContext,
    label: TrialLabel,
    program_text: &str,
) -> Result<PathBuf, CvgError> {
    let path = ctx.trial_program_path(label);
    let trial_error = |code: &str, err: std::io::Error| {
        CvgError::Trial(
            ErrorInfo::new(code, err.to_string())
                .with_context("trial", label.to_string())
                .with_context("path", path.display().to_string()),
        )
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| trial_error("trial-dir", err))?;
    }
    fs::write(&path, rewrite_program(program_text, label))
        .map_err(|err| trial_error("trial-write", err))?;
    Ok(path)
}
