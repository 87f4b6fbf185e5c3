use serde::Serialize;

/// Upper bound for simulated progress; only completion reaches 100.
pub const MAX_SIMULATED_PROGRESS: u8 = 90;

/// Message shown once the deadline has passed.
pub const TIMEOUT_MESSAGE: &str = "Loading is taking longer than expected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingPhase {
    Idle,
    Loading,
    /// Signal dropped before the deadline.
    Settled,
    /// Deadline passed first.
    TimedOut,
}

/// Presentation snapshot. `progress` is an estimate in `0..=100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadingState {
    pub phase: LoadingPhase,
    pub is_loading: bool,
    pub progress: u8,
    pub message: String,
    pub has_timed_out: bool,
    pub can_retry: bool,
}

impl LoadingState {
    pub(super) fn idle(message: &str, can_retry: bool) -> Self {
        Self {
            phase: LoadingPhase::Idle,
            is_loading: false,
            progress: 0,
            message: message.to_string(),
            has_timed_out: false,
            can_retry,
        }
    }
}
