use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use cvg_core::{CvgError, ErrorInfo, ExperimentContext, TrialLabel, TrialResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::directive::write_trial_program;
use crate::memory::MemorySampler;
use crate::parse::{combined_output, extract_probabilities};

/// How to launch the external inference engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSpec {
    /// Engine executable.
    #[serde(default = "EngineSpec::default_program")]
    pub program: PathBuf,
    /// Arguments placed before the trial program path.
    #[serde(default)]
    pub args: Vec<String>,
    /// Interval between resident memory samples.
    #[serde(default = "EngineSpec::default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl EngineSpec {
    fn default_program() -> PathBuf {
        PathBuf::from("pasp")
    }

    const fn default_poll_interval_ms() -> u64 {
        5
    }

    /// Sampling interval as a [`Duration`], never zero.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

impl Default for EngineSpec {
    fn default() -> Self {
        Self {
            program: Self::default_program(),
            args: Vec::new(),
            poll_interval_ms: Self::default_poll_interval_ms(),
        }
    }
}

/// Something that can execute one trial of an experiment.
///
/// Errors are reported per trial; the caller decides whether a failed trial
/// leaves a gap or aborts.
pub trait TrialEngine {
    /// Runs the engine on `program_text` configured for `label`.
    fn run_trial(&self, label: TrialLabel, program_text: &str) -> Result<TrialResult, CvgError>;
}

/// Runs the external engine as a child process, one trial at a time.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    spec: EngineSpec,
    ctx: ExperimentContext,
    num_queries: usize,
}

impl ProcessRunner {
    /// Creates a runner writing trial programs below `ctx`.
    pub fn new(spec: EngineSpec, ctx: ExperimentContext, num_queries: usize) -> Self {
        Self {
            spec,
            ctx,
            num_queries,
        }
    }

    fn execute(&self, label: TrialLabel, program_path: &Path) -> Result<TrialResult, CvgError> {
        let trial_error = |code: &str, message: String| {
            CvgError::Trial(
                ErrorInfo::new(code, message)
                    .with_context("trial", label.to_string())
                    .with_context("engine", self.spec.program.display().to_string()),
            )
        };

        let mut command = Command::new(&self.spec.program);
        command
            .args(&self.spec.args)
            .arg(program_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let started = Instant::now();
        let child = command
            .spawn()
            .map_err(|err| trial_error("engine-spawn", err.to_string()))?;
        let pid = child.id();
        debug!(pid, trial = %label, "engine spawned");

        let sampler = MemorySampler::start(pid, self.spec.poll_interval());
        let waited = child.wait_with_output();
        let peak = sampler.stop();
        let elapsed = started.elapsed();
        let output = waited.map_err(|err| trial_error("engine-wait", err.to_string()))?;

        if !output.status.success() {
            warn!(
                trial = %label,
                status = %output.status,
                "engine exited unsuccessfully, parsing its output anyway"
            );
        }

        let text = combined_output(&output.stdout, &output.stderr);
        let probabilities = extract_probabilities(&text, self.num_queries);
        if probabilities.len() < self.num_queries {
            warn!(
                trial = %label,
                expected = self.num_queries,
                found = probabilities.len(),
                "engine reported fewer queries than expected"
            );
        }

        let result = TrialResult::new(
            label,
            probabilities,
            elapsed.as_secs_f64(),
            peak.megabytes(),
        );
        info!(
            trial = %label,
            runtime_s = result.runtime_seconds,
            peak_mb = result.peak_memory_mb,
            "trial finished"
        );
        Ok(result)
    }
}

impl TrialEngine for ProcessRunner {
    fn run_trial(&self, label: TrialLabel, program_text: &str) -> Result<TrialResult, CvgError> {
        let program_path = write_trial_program(&self.ctx, label, program_text)?;
        info!(path = %program_path.display(), trial = %label, "running engine");
        self.execute(label, &program_path)
    }
}
