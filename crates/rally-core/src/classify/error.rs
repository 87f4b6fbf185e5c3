use serde::Serialize;
use thiserror::Error;

use super::ErrorKind;

/// A failure after classification: its kind plus the user-facing message.
///
/// Produced only by [`classify`](super::classify); there is no way to mutate
/// one afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct ClassifiedError {
    kind: ErrorKind,
    message: String,
}

impl ClassifiedError {
    pub(super) fn new(kind: ErrorKind, message: String) -> Self {
        Self { kind, message }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
