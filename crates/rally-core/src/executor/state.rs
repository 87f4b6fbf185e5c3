//! Recovery state and its transition function.
//!
//! `transition` never performs side effects; it returns the next state and
//! the commands the driver must carry out, in order.

use serde::Serialize;
use std::time::Duration;

use super::ExecutorConfig;
use crate::backoff::backoff_delay;
use crate::classify::ClassifiedError;
use crate::notify::{Notification, Severity};

/// Observable state of an executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoveryState {
    pub is_recovering: bool,
    pub attempt_count: u32,
    pub last_error: Option<ClassifiedError>,
    pub can_retry: bool,
}

impl Default for RecoveryState {
    fn default() -> Self {
        Self {
            is_recovering: false,
            attempt_count: 0,
            last_error: None,
            can_retry: true,
        }
    }
}

impl RecoveryState {
    /// True when this is the zero value.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryEvent {
    /// A fresh session starts; the counter restarts at zero.
    Started,
    /// The current attempt produced a value.
    Succeeded,
    /// The current attempt failed.
    Failed(ClassifiedError),
    /// Pending work abandoned; counters and last error are kept.
    Cancelled,
    /// Unconditional return to the zero value.
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryCommand {
    /// Invoke the `on_success` hook.
    ReportSuccess,
    /// Invoke the `on_error` hook.
    ReportError(ClassifiedError),
    /// Hand a notification to the sink.
    Notify(Notification),
    /// Run the operation again after `delay`; `attempt` is the 1-based retry number.
    ScheduleRetry { attempt: u32, delay: Duration },
    /// The session is over with this failure.
    GiveUp(ClassifiedError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: RecoveryState,
    pub commands: Vec<RecoveryCommand>,
}

/// Compute the next state for `event`.
pub fn transition(
    state: &RecoveryState,
    event: RecoveryEvent,
    config: &ExecutorConfig,
) -> Transition {
    match event {
        RecoveryEvent::Started => Transition {
            state: RecoveryState {
                is_recovering: true,
                ..RecoveryState::default()
            },
            commands: Vec::new(),
        },
        RecoveryEvent::Succeeded => Transition {
            state: RecoveryState::default(),
            commands: vec![RecoveryCommand::ReportSuccess],
        },
        RecoveryEvent::Failed(error) => on_failure(state, error, config),
        RecoveryEvent::Cancelled => Transition {
            state: RecoveryState {
                is_recovering: false,
                ..state.clone()
            },
            commands: Vec::new(),
        },
        RecoveryEvent::Reset => Transition {
            state: RecoveryState::default(),
            commands: Vec::new(),
        },
    }
}

fn on_failure(state: &RecoveryState, error: ClassifiedError, config: &ExecutorConfig) -> Transition {
    let attempt_count = state
        .attempt_count
        .saturating_add(1)
        .min(config.max_retries());
    let can_retry = config.can_retry(attempt_count, &error);

    let mut commands = vec![RecoveryCommand::ReportError(error.clone())];
    // First failure is always surfaced, and so is the one that ends the session.
    if !can_retry || attempt_count == 1 {
        let severity = if can_retry {
            Severity::Warning
        } else {
            Severity::Error
        };
        commands.push(RecoveryCommand::Notify(Notification::for_error(
            &error, severity,
        )));
    }
    if can_retry {
        commands.push(RecoveryCommand::ScheduleRetry {
            attempt: attempt_count,
            delay: backoff_delay(attempt_count, config.base_delay()),
        });
    } else {
        commands.push(RecoveryCommand::GiveUp(error.clone()));
    }

    Transition {
        state: RecoveryState {
            is_recovering: can_retry,
            attempt_count,
            last_error: Some(error),
            can_retry,
        },
        commands,
    }
}
