use thiserror::Error;

use crate::classify::ClassifiedError;

/// Why an execution session ended without a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecuteError {
    /// Terminal failure: retries exhausted or the failure is not retryable.
    /// The same error is recorded in the executor's `RecoveryState`.
    #[error("{0}")]
    Failed(ClassifiedError),
    /// A newer `execute`/`retry`, or a `reset`/`cancel`, replaced this session.
    #[error("execution superseded by a newer session")]
    Superseded,
    /// `retry` was requested but the last session left `can_retry == false`.
    #[error("retry is not available for this session")]
    RetryUnavailable,
}

impl ExecuteError {
    /// The classified failure, if the session actually failed.
    pub fn classified(&self) -> Option<&ClassifiedError> {
        match self {
            ExecuteError::Failed(e) => Some(e),
            ExecuteError::Superseded | ExecuteError::RetryUnavailable => None,
        }
    }
}
