//! Session driver: run the operation, apply transitions, wait out backoff.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::oneshot;

use super::state::{transition, RecoveryCommand, RecoveryEvent, RecoveryState};
use super::{ExecuteError, ExecutorConfig};
use crate::backoff::{self, TimerGuard};
use crate::classify::{classify, ClassifiedError};
use crate::notify::{NotificationSink, TracingSink};

/// Session bookkeeping. `generation` identifies the live session; bumping it
/// invalidates every older one.
#[derive(Debug, Default)]
struct Session {
    generation: u64,
    pending: TimerGuard,
}

/// What the driver does after applying a failure.
enum Next {
    Retry { attempt: u32, delay: Duration },
    Stop(ClassifiedError),
}

/// Wraps a fallible async operation with classification, bounded retries and
/// exponential backoff.
///
/// One executor runs at most one session at a time: starting a new one
/// cancels the pending backoff of the previous session, and the previous
/// caller receives [`ExecuteError::Superseded`].
pub struct OperationExecutor {
    config: ExecutorConfig,
    sink: Arc<dyn NotificationSink>,
    session: Mutex<Session>,
    state: Mutex<RecoveryState>,
}

impl fmt::Debug for OperationExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationExecutor")
            .field("config", &self.config)
            .field("state", &*self.lock_state())
            .finish_non_exhaustive()
    }
}

impl Default for OperationExecutor {
    fn default() -> Self {
        Self::new(ExecutorConfig::default())
    }
}

impl OperationExecutor {
    /// Executor that reports notifications through [`TracingSink`].
    pub fn new(config: ExecutorConfig) -> Self {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    pub fn with_sink(config: ExecutorConfig, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            config,
            sink,
            session: Mutex::new(Session::default()),
            state: Mutex::new(RecoveryState::default()),
        }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Copy of the current recovery state.
    pub fn snapshot(&self) -> RecoveryState {
        self.lock_state().clone()
    }

    /// Run `operation` until it succeeds, the retry budget is spent, or the
    /// failure is not retryable. Retries continue the same session; the
    /// attempt counter starts at zero for every call.
    pub async fn execute<F, Fut, T, E>(
        &self,
        operation: F,
        context: Option<&str>,
    ) -> Result<T, ExecuteError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        self.run_session(operation, context).await
    }

    /// Restart from attempt zero, if the last session left `can_retry` set.
    pub async fn retry<F, Fut, T, E>(
        &self,
        operation: F,
        context: Option<&str>,
    ) -> Result<T, ExecuteError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        if !self.lock_state().can_retry {
            tracing::debug!(context = context.unwrap_or(""), "retry refused");
            return Err(ExecuteError::RetryUnavailable);
        }
        self.run_session(operation, context).await
    }

    /// Abandon any session and return to the zero state. No hooks, no
    /// notifications.
    pub fn reset(&self) {
        let mut session = self.lock_session();
        session.generation += 1;
        session.pending.cancel();
        let mut state = self.lock_state();
        *state = transition(&state, RecoveryEvent::Reset, &self.config).state;
    }

    /// Stop the current session (cancelling a pending retry) but keep the
    /// attempt count and last error for inspection.
    pub fn cancel(&self) {
        let mut session = self.lock_session();
        session.generation += 1;
        session.pending.cancel();
        let mut state = self.lock_state();
        *state = transition(&state, RecoveryEvent::Cancelled, &self.config).state;
    }

    async fn run_session<F, Fut, T, E>(
        &self,
        mut operation: F,
        context: Option<&str>,
    ) -> Result<T, ExecuteError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let generation = self.begin_session();
        let label = context.unwrap_or("");
        let mut attempt = 1u32;

        loop {
            tracing::debug!(context = label, attempt, "running operation");
            let outcome = operation().await;

            match outcome {
                Ok(value) => {
                    self.apply(generation, RecoveryEvent::Succeeded)
                        .ok_or(ExecuteError::Superseded)?;
                    if attempt > 1 {
                        tracing::info!(context = label, attempt, "operation recovered");
                    }
                    return Ok(value);
                }
                Err(raw) => {
                    let classified = classify(&raw, context);
                    tracing::debug!(
                        context = label,
                        attempt,
                        kind = %classified.kind(),
                        raw = %raw,
                        "operation failed"
                    );
                    let next = self
                        .apply(generation, RecoveryEvent::Failed(classified))
                        .ok_or(ExecuteError::Superseded)?;
                    match next {
                        Some(Next::Retry { attempt: n, delay }) => {
                            tracing::info!(
                                context = label,
                                attempt = n,
                                delay_ms = delay.as_millis() as u64,
                                "retry scheduled"
                            );
                            self.wait_backoff(generation, n).await?;
                            attempt = n + 1;
                        }
                        Some(Next::Stop(error)) => {
                            tracing::warn!(
                                context = label,
                                attempts = attempt,
                                kind = %error.kind(),
                                "giving up"
                            );
                            return Err(ExecuteError::Failed(error));
                        }
                        None => return Err(ExecuteError::Superseded),
                    }
                }
            }
        }
    }

    fn begin_session(&self) -> u64 {
        let mut session = self.lock_session();
        session.generation += 1;
        if session.pending.is_armed() {
            tracing::debug!("superseding pending retry");
        }
        session.pending.cancel();
        let mut state = self.lock_state();
        *state = transition(&state, RecoveryEvent::Started, &self.config).state;
        session.generation
    }

    /// Apply `event` if `generation` is still live, then run the resulting
    /// commands with no lock held. Returns `None` for a stale session.
    fn apply(&self, generation: u64, event: RecoveryEvent) -> Option<Option<Next>> {
        let commands = {
            let session = self.lock_session();
            if session.generation != generation {
                return None;
            }
            let mut state = self.lock_state();
            let t = transition(&state, event, &self.config);
            *state = t.state;
            t.commands
        };

        let mut next = None;
        for command in commands {
            match command {
                RecoveryCommand::ReportSuccess => self.config.fire_success(),
                RecoveryCommand::ReportError(e) => self.config.fire_error(&e),
                RecoveryCommand::Notify(n) => self.sink.notify(n),
                RecoveryCommand::ScheduleRetry { attempt, delay } => {
                    next = Some(Next::Retry { attempt, delay })
                }
                RecoveryCommand::GiveUp(e) => next = Some(Next::Stop(e)),
            }
        }
        Some(next)
    }

    /// Arm the backoff timer for retry `attempt` and wait for it. Fails with
    /// `Superseded` if the timer is cancelled or the session replaced.
    async fn wait_backoff(&self, generation: u64, attempt: u32) -> Result<(), ExecuteError> {
        let (tx, rx) = oneshot::channel();
        {
            let mut session = self.lock_session();
            if session.generation != generation {
                return Err(ExecuteError::Superseded);
            }
            let handle = backoff::schedule(attempt, self.config.base_delay(), move || {
                let _ = tx.send(());
            });
            session.pending.replace(handle);
        }
        // A cancelled timer drops its callback, closing the channel.
        rx.await.map_err(|_| ExecuteError::Superseded)?;
        if self.lock_session().generation != generation {
            return Err(ExecuteError::Superseded);
        }
        Ok(())
    }

    fn lock_session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_state(&self) -> MutexGuard<'_, RecoveryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for OperationExecutor {
    fn drop(&mut self) {
        self.lock_session().pending.cancel();
    }
}
