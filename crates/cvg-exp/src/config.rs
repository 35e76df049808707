use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use cvg_core::{CvgError, ErrorInfo};
use cvg_metrics::DEFAULT_THRESHOLDS;
use cvg_runner::EngineSpec;
use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleSpec;

fn config_error(code: &str, err: impl ToString) -> CvgError {
    CvgError::Config(ErrorInfo::new(code, err.to_string()))
}

/// Programs whose exact inference is known not to finish in reasonable time.
const KNOWN_SLOW_EXACT: [&str; 5] = [
    "argumentation",
    "mango",
    "smoke",
    "arithmetic",
    "latinsquare",
];

/// Set of experiment names for which the exact trial is skipped.
///
/// This is a static exception list established offline, not a property
/// computed from the program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkipExactPolicy {
    names: BTreeSet<String>,
}

impl SkipExactPolicy {
    /// Policy skipping exactly the provided names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Policy that never skips the exact trial.
    pub fn never() -> Self {
        Self {
            names: BTreeSet::new(),
        }
    }

    /// Whether `experiment` must run without an exact trial.
    pub fn skips(&self, experiment: &str) -> bool {
        self.names.contains(experiment)
    }
}

impl Default for SkipExactPolicy {
    fn default() -> Self {
        Self::new(KNOWN_SLOW_EXACT)
    }
}

/// Lab-wide configuration, every field optional on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabConfig {
    /// How the inference engine is launched.
    #[serde(default)]
    pub engine: EngineSpec,
    /// Experiments that never get an exact trial.
    #[serde(default)]
    pub skip_exact: SkipExactPolicy,
    /// Budget schedule shape.
    #[serde(default)]
    pub schedule: ScheduleSpec,
    /// Relative error thresholds probed per query, loosest first.
    #[serde(default = "LabConfig::default_thresholds")]
    pub thresholds: Vec<f64>,
    /// Root directory for every experiment artefact.
    #[serde(default = "LabConfig::default_output_root")]
    pub output_root: PathBuf,
}

impl LabConfig {
    fn default_thresholds() -> Vec<f64> {
        DEFAULT_THRESHOLDS.to_vec()
    }

    fn default_output_root() -> PathBuf {
        PathBuf::from("results")
    }

    /// Rejects settings that would make schedules or thresholds meaningless.
    pub fn validate(&self) -> Result<(), CvgError> {
        if self.schedule.points < 2 {
            return Err(CvgError::Config(
                ErrorInfo::new("schedule-points", "schedule needs at least two points")
                    .with_context("points", self.schedule.points.to_string()),
            ));
        }
        if !(self.schedule.warp_exponent.is_finite() && self.schedule.warp_exponent > 0.0) {
            return Err(CvgError::Config(
                ErrorInfo::new("schedule-warp", "warp exponent must be positive and finite")
                    .with_context("warp_exponent", self.schedule.warp_exponent.to_string()),
            ));
        }
        if self.thresholds.is_empty() {
            return Err(CvgError::Config(
                ErrorInfo::new("thresholds-empty", "no convergence thresholds configured")
                    .with_hint("omit the key to use the default battery"),
            ));
        }
        if let Some(bad) = self
            .thresholds
            .iter()
            .find(|threshold| !(threshold.is_finite() && **threshold > 0.0))
        {
            return Err(CvgError::Config(
                ErrorInfo::new("threshold-range", "thresholds must be positive and finite")
                    .with_context("threshold", bad.to_string()),
            ));
        }
        Ok(())
    }
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            engine: EngineSpec::default(),
            skip_exact: SkipExactPolicy::default(),
            schedule: ScheduleSpec::default(),
            thresholds: Self::default_thresholds(),
            output_root: Self::default_output_root(),
        }
    }
}

/// Parses a configuration from YAML text. Blank documents yield defaults.
pub fn parse_config(text: &str) -> Result<LabConfig, CvgError> {
    if text.trim().is_empty() {
        return Ok(LabConfig::default());
    }
    let config: LabConfig =
        serde_yaml::from_str(text).map_err(|err| config_error("config-parse", err))?;
    config.validate()?;
    Ok(config)
}

/// Loads and validates a configuration file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<LabConfig, CvgError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|err| {
        CvgError::Config(
            ErrorInfo::new("config-read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    parse_config(&text).map_err(|err| match err {
        CvgError::Config(info) => {
            CvgError::Config(info.with_context("path", path.display().to_string()))
        }
        other => other,
    })
}
