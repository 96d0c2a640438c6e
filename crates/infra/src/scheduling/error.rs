//! Scheduler error types

use std::time::Duration;

use agendaflow_domain::AgendaError;
use thiserror::Error;
use tokio::task::JoinError;
use tokio::time::error::Elapsed;

use crate::errors::InfraError;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A background task did not finish in time after cancellation
    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration, source: Elapsed },

    /// A background task panicked or was aborted
    #[error("Task join failed: {0}")]
    TaskJoinFailed(#[from] JoinError),

    /// The operation needs a running scheduler
    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),
}

impl From<SchedulerError> for InfraError {
    fn from(err: SchedulerError) -> Self {
        let agenda_err = match err {
            SchedulerError::EngineUnavailable(_) => AgendaError::InvalidInput(err.to_string()),
            SchedulerError::Timeout { .. } => AgendaError::Timeout(err.to_string()),
            SchedulerError::TaskJoinFailed(_) => AgendaError::Internal(err.to_string()),
        };
        Self(agenda_err)
    }
}

impl From<SchedulerError> for AgendaError {
    fn from(err: SchedulerError) -> Self {
        InfraError::from(err).into()
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
