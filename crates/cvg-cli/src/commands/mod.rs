use std::path::Path;

use cvg_core::CvgError;
use cvg_exp::{load_config, LabConfig};

pub mod report;
pub mod run;
pub mod schedule;

/// Loads the lab configuration, falling back to defaults without a file.
pub fn lab_config(path: Option<&Path>) -> Result<LabConfig, CvgError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(LabConfig::default()),
    }
}
