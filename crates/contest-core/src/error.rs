//! Error types for contest-core operations.

use thiserror::Error;

use crate::config::ConfigError;

/// Result type for contest-core operations.
pub type Result<T> = std::result::Result<T, ContestError>;

/// Errors that stop a batch before any trial runs.
#[derive(Debug, Error)]
pub enum ContestError {
    /// A negative amount, a non-positive count, or an unusable agent roster.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ContestError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ContestError::InvalidConfiguration(message.into())
    }
}

/// Errors that end a single trial without producing an outcome.
///
/// The orchestrator records these as failed trials instead of aborting the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrialError {
    #[error("no winner after {limit} rounds ({active} agents still active)")]
    RoundLimitExceeded { limit: u64, active: usize },

    #[error("trial panicked: {0}")]
    Panicked(String),
}
