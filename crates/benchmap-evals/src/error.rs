//! Error types for evaluation plumbing.

use thiserror::Error;

/// Errors raised when generating configs or driving the harness.
#[derive(Debug, Error)]
pub enum EvalError {
    /// A model server name has no settings entry
    #[error(transparent)]
    Settings(#[from] benchmap_settings::SettingsError),

    /// The evaluation harness is not importable by the configured python
    #[error(
        "Evaluation harness not available. Install it with: pip install evalscope"
    )]
    HarnessUnavailable,

    /// The harness subprocess exited with a failure status
    #[error("Harness run failed (exit code {code:?}): {stderr}")]
    HarnessFailed { code: Option<i32>, stderr: String },

    /// A dataset record is missing required fields
    #[error("Invalid dataset record: {0}")]
    InvalidRecord(String),

    /// Filesystem error while preparing or reading a run
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config or report JSON could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
