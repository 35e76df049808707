use std::fs;
use std::path::PathBuf;

use cvg_core::{program_hash, Budget, CvgError, ErrorInfo, ExperimentContext, TrialHistory, TrialResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Version of the on-disk envelope; bumped on incompatible layout changes.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CacheEnvelope {
    schema_version: u32,
    program_hash: String,
    trials: Vec<TrialResult>,
    schedule: Vec<Budget>,
}

/// Trial history restored from disk together with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedExperiment {
    /// SHA-256 of the program text the history was produced from.
    pub program_hash: String,
    /// Trials and schedule exactly as persisted.
    pub history: TrialHistory,
}

impl CachedExperiment {
    /// Whether the cached history was produced from `program_text`.
    pub fn matches_program(&self, program_text: &str) -> bool {
        self.program_hash == program_hash(program_text)
    }
}

/// Sole reader and writer of an experiment's persisted trial history.
///
/// The binary encoding keeps every `f64` bit pattern, NaN included.
#[derive(Debug, Clone)]
pub struct ExperimentCache {
    path: PathBuf,
}

impl ExperimentCache {
    /// Cache for the experiment described by `ctx`.
    pub fn new(ctx: &ExperimentContext) -> Self {
        Self {
            path: ctx.cache_path(),
        }
    }

    /// Location of the cache file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn cache_error(&self, code: &str, err: impl ToString) -> CvgError {
        CvgError::Cache(
            ErrorInfo::new(code, err.to_string())
                .with_context("path", self.path.display().to_string()),
        )
    }

    /// Returns the persisted history, or `None` when nothing was cached yet.
    pub fn load(&self) -> Result<Option<CachedExperiment>, CvgError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no cached experiment");
            return Ok(None);
        }
        let bytes = fs::read(&self.path).map_err(|err| self.cache_error("cache-read", err))?;
        let envelope: CacheEnvelope = bincode::deserialize(&bytes)
            .map_err(|err| self.cache_error("cache-decode", err))?;
        if envelope.schema_version != CACHE_SCHEMA_VERSION {
            return Err(CvgError::Cache(
                ErrorInfo::new("cache-schema", "unsupported cache schema version")
                    .with_context("path", self.path.display().to_string())
                    .with_context("found", envelope.schema_version.to_string())
                    .with_context("expected", CACHE_SCHEMA_VERSION.to_string())
                    .with_hint("delete the cache file to rerun the experiment"),
            ));
        }
        info!(
            path = %self.path.display(),
            trials = envelope.trials.len(),
            "loaded cached experiment"
        );
        Ok(Some(CachedExperiment {
            program_hash: envelope.program_hash,
            history: TrialHistory {
                trials: envelope.trials,
                schedule: envelope.schedule,
            },
        }))
    }

    /// Persists `history`, replacing any previous state for the experiment.
    pub fn save(&self, history: &TrialHistory, program_text: &str) -> Result<(), CvgError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| self.cache_error("cache-mkdir", err))?;
        }
        let envelope = CacheEnvelope {
            schema_version: CACHE_SCHEMA_VERSION,
            program_hash: program_hash(program_text),
            trials: history.trials.clone(),
            schedule: history.schedule.clone(),
        };
        let bytes =
            bincode::serialize(&envelope).map_err(|err| self.cache_error("cache-encode", err))?;
        let staging = self.path.with_extension("bin.tmp");
        fs::write(&staging, bytes).map_err(|err| self.cache_error("cache-write", err))?;
        fs::rename(&staging, &self.path).map_err(|err| self.cache_error("cache-rename", err))?;
        info!(
            path = %self.path.display(),
            trials = history.trials.len(),
            "persisted experiment"
        );
        Ok(())
    }
}
