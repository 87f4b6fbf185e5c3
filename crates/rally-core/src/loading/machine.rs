//! Pure loading state machine: `Idle -> Loading -> {Settled | TimedOut}`.
//!
//! Every entry into `Loading` opens a new session number. Timer events carry
//! the session they were armed for, so a deadline or tick left over from an
//! earlier session is ignored.

use std::time::Duration;

use super::state::{LoadingPhase, LoadingState, MAX_SIMULATED_PROGRESS, TIMEOUT_MESSAGE};
use super::LoadingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingEvent {
    /// The external "is loading" signal changed (or was re-asserted).
    Signal(bool),
    /// Progress tick with the increment to apply.
    Tick { session: u64, increment: u8 },
    /// Deadline timer fired.
    Deadline { session: u64 },
    /// Caller pressed retry after a timeout.
    RetryRequested,
    /// Owner is going away; stop every timer.
    Teardown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingCommand {
    StartDeadline { session: u64, after: Duration },
    StartProgress { session: u64, every: Duration },
    CancelDeadline,
    CancelProgress,
    /// Call the configured retry callback.
    InvokeRetry,
}

#[derive(Debug, Clone)]
pub struct LoadingMachine {
    config: LoadingConfig,
    state: LoadingState,
    session: u64,
    retry_enabled: bool,
}

impl LoadingMachine {
    /// `retry_enabled` reflects whether the owner configured a retry callback.
    pub fn new(config: LoadingConfig, retry_enabled: bool) -> Self {
        let state = LoadingState::idle(&config.loading_message, retry_enabled);
        Self {
            config,
            state,
            session: 0,
            retry_enabled,
        }
    }

    pub fn state(&self) -> &LoadingState {
        &self.state
    }

    pub fn config(&self) -> &LoadingConfig {
        &self.config
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// Apply `event`, returning the timer/callback commands to run in order.
    pub fn step(&mut self, event: LoadingEvent) -> Vec<LoadingCommand> {
        match event {
            LoadingEvent::Signal(true) => {
                if self.state.phase == LoadingPhase::Loading {
                    Vec::new()
                } else {
                    self.enter_loading()
                }
            }
            LoadingEvent::Signal(false) => {
                // Only a live session settles; a late drop after a timeout
                // leaves the timed-out state in place.
                if self.state.phase != LoadingPhase::Loading {
                    return Vec::new();
                }
                self.state.phase = LoadingPhase::Settled;
                self.state.is_loading = false;
                self.state.has_timed_out = false;
                self.state.progress = 100;
                vec![LoadingCommand::CancelDeadline, LoadingCommand::CancelProgress]
            }
            LoadingEvent::Tick { session, increment } => {
                if self.is_live(session) {
                    self.state.progress = self
                        .state
                        .progress
                        .saturating_add(increment)
                        .min(MAX_SIMULATED_PROGRESS)
                        .max(self.state.progress);
                }
                Vec::new()
            }
            LoadingEvent::Deadline { session } => {
                if !self.is_live(session) {
                    return Vec::new();
                }
                self.state.phase = LoadingPhase::TimedOut;
                self.state.is_loading = false;
                self.state.has_timed_out = true;
                self.state.message = TIMEOUT_MESSAGE.to_string();
                vec![LoadingCommand::CancelProgress]
            }
            LoadingEvent::RetryRequested => {
                if self.state.phase != LoadingPhase::TimedOut || !self.retry_enabled {
                    return Vec::new();
                }
                let mut commands = self.enter_loading();
                commands.push(LoadingCommand::InvokeRetry);
                commands
            }
            LoadingEvent::Teardown => {
                self.session += 1;
                if self.state.phase == LoadingPhase::Loading {
                    self.state.phase = LoadingPhase::Idle;
                    self.state.is_loading = false;
                }
                vec![LoadingCommand::CancelDeadline, LoadingCommand::CancelProgress]
            }
        }
    }

    fn is_live(&self, session: u64) -> bool {
        session == self.session && self.state.phase == LoadingPhase::Loading
    }

    fn enter_loading(&mut self) -> Vec<LoadingCommand> {
        self.session += 1;
        self.state = LoadingState {
            phase: LoadingPhase::Loading,
            is_loading: true,
            progress: 0,
            message: self.config.loading_message.clone(),
            has_timed_out: false,
            can_retry: self.retry_enabled,
        };

        let mut commands = vec![
            LoadingCommand::CancelDeadline,
            LoadingCommand::CancelProgress,
            LoadingCommand::StartDeadline {
                session: self.session,
                after: self.config.timeout,
            },
        ];
        if self.config.show_progress {
            commands.push(LoadingCommand::StartProgress {
                session: self.session,
                every: self.config.tick_interval,
            });
        }
        commands
    }
}
