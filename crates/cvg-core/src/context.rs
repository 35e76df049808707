//! Explicit description of where an experiment keeps its artefacts.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{CvgError, ErrorInfo};
use crate::types::TrialLabel;

/// Figure families emitted for every experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotKind {
    /// Approximate probability against the ground truth line.
    ExactVsApprox,
    /// Absolute error per budget.
    AbsError,
    /// Relative error per budget.
    ErrorVsNmodels,
    /// Runtime per budget.
    Runtime,
    /// Convergence spheres per threshold.
    Spheres,
}

impl PlotKind {
    /// All figure families in directory creation order.
    pub const ALL: [PlotKind; 5] = [
        PlotKind::ExactVsApprox,
        PlotKind::AbsError,
        PlotKind::ErrorVsNmodels,
        PlotKind::Runtime,
        PlotKind::Spheres,
    ];

    /// Directory name used for this family.
    pub fn dir_name(&self) -> &'static str {
        match self {
            PlotKind::ExactVsApprox => "exact_vs_approx",
            PlotKind::AbsError => "abs_error",
            PlotKind::ErrorVsNmodels => "error_vs_nmodels",
            PlotKind::Runtime => "runtime",
            PlotKind::Spheres => "spheres",
        }
    }
}

/// Output root plus experiment identifier, threaded through every component
/// that touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentContext {
    /// Directory shared by all experiments.
    pub output_root: PathBuf,
    /// Experiment identifier, used as namespace for every artefact.
    pub name: String,
}

impl ExperimentContext {
    /// Creates a context for `name` below `output_root`.
    pub fn new(output_root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            output_root: output_root.into(),
            name: name.into(),
        }
    }

    /// Derives the experiment name from a program path (its file stem).
    pub fn for_program(output_root: impl Into<PathBuf>, program: &Path) -> Result<Self, CvgError> {
        let name = program
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| {
                CvgError::Setup(
                    ErrorInfo::new("experiment-name", "cannot derive experiment name")
                        .with_context("program", program.display().to_string()),
                )
            })?;
        Ok(Self::new(output_root, name))
    }

    /// Directory owned by this experiment.
    pub fn experiment_dir(&self) -> PathBuf {
        self.output_root.join(&self.name)
    }

    /// Directory receiving the rewritten program copies.
    pub fn trials_dir(&self) -> PathBuf {
        self.experiment_dir().join("trials")
    }

    /// Path of the rewritten program for one trial.
    pub fn trial_program_path(&self, label: TrialLabel) -> PathBuf {
        self.trials_dir().join(format!("test_{label}.lp"))
    }

    /// Directory for one figure family.
    pub fn plot_dir(&self, kind: PlotKind) -> PathBuf {
        self.experiment_dir().join("plots").join(kind.dir_name())
    }

    /// Gallery shared across experiments.
    pub fn gallery_dir(&self) -> PathBuf {
        self.output_root.join("main_plots")
    }

    /// Persisted trial history.
    pub fn cache_path(&self) -> PathBuf {
        self.output_root.join(format!("results_{}.bin", self.name))
    }

    /// Canonical JSON metrics report.
    pub fn report_path(&self) -> PathBuf {
        self.experiment_dir().join("metrics_report.json")
    }

    /// Creates every directory the experiment writes into. Existing
    /// directories and their contents are left untouched.
    pub fn prepare(&self) -> Result<(), CvgError> {
        let mut dirs = vec![self.trials_dir(), self.gallery_dir()];
        dirs.extend(PlotKind::ALL.iter().map(|kind| self.plot_dir(*kind)));
        for dir in dirs {
            fs::create_dir_all(&dir).map_err(|err| {
                CvgError::Setup(
                    ErrorInfo::new("create-dir", err.to_string())
                        .with_context("path", dir.display().to_string()),
                )
            })?;
        }
        Ok(())
    }
}
