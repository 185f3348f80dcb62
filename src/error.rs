//! Error taxonomy for the core stages (scoring, aggregation, rendering).
//!
//! Collectors and the notifier stay on `anyhow`; everything that reads or
//! writes a pipeline artifact reports one of these.

use std::path::PathBuf;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Expected input artifact is missing or unreadable.
    #[error("data unavailable: {path}: {source}")]
    DataUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact exists but does not have the expected shape.
    #[error("malformed input: {path}: {reason}")]
    MalformedInput { path: PathBuf, reason: String },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        PipelineError::MalformedInput {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, PipelineError::DataUnavailable { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, PipelineError::MalformedInput { .. })
    }
}
