//! Shared error types for the services crate.

use api::ApiError;
use thiserror::Error;

/// Errors emitted by exam session services.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("failed to load quiz: {0}")]
    Load(ApiError),
    #[error("failed to submit exam: {0}")]
    Submit(ApiError),
    #[error("session runner has stopped")]
    RunnerStopped,
}
