//! Structured error types shared across CVG crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`CvgError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (experiment, budget, paths, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for convergence experiments.
///
/// The families follow the failure taxonomy of a run: setup failures abort,
/// trial failures leave a gap in the schedule, parse and metric failures
/// degrade to NaN before they ever reach this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum CvgError {
    /// Output directory or filesystem preparation failed.
    #[error("setup error: {0}")]
    Setup(ErrorInfo),
    /// A single engine invocation could not be completed.
    #[error("trial error: {0}")]
    Trial(ErrorInfo),
    /// Engine output could not be interpreted.
    #[error("parse error: {0}")]
    Parse(ErrorInfo),
    /// Metric derivation failed.
    #[error("metrics error: {0}")]
    Metrics(ErrorInfo),
    /// Persisted experiment state could not be read or written.
    #[error("cache error: {0}")]
    Cache(ErrorInfo),
    /// Configuration could not be loaded or is invalid.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// Figure rendering failed.
    #[error("render error: {0}")]
    Render(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl CvgError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            CvgError::Setup(info)
            | CvgError::Trial(info)
            | CvgError::Parse(info)
            | CvgError::Metrics(info)
            | CvgError::Cache(info)
            | CvgError::Config(info)
            | CvgError::Serde(info)
            | CvgError::Render(info) => info,
        }
    }

    /// Whether the error must terminate the whole experiment run.
    ///
    /// Trial, parse and metric failures are absorbed locally.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            CvgError::Trial(_) | CvgError::Parse(_) | CvgError::Metrics(_)
        )
    }
}
