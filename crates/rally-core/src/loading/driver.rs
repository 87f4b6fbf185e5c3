//! Runs a [`LoadingMachine`] against real (tokio) timers.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use super::machine::{LoadingCommand, LoadingEvent, LoadingMachine};
use super::progress::{ProgressSource, RandomProgress};
use super::state::LoadingState;
use super::LoadingConfig;
use crate::backoff::{self, TimerGuard};

type RetryCallback = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Default)]
struct Timers {
    deadline: TimerGuard,
    progress: TimerGuard,
}

struct Inner {
    machine: Mutex<LoadingMachine>,
    timers: Mutex<Timers>,
    progress: Mutex<Box<dyn ProgressSource>>,
    on_retry: Option<RetryCallback>,
}

/// Loading state tracker with a deadline and optional simulated progress.
///
/// Timers hold only a weak reference back to the tracker; dropping it tears
/// everything down.
pub struct BoundedLoading {
    inner: Arc<Inner>,
}

impl fmt::Debug for BoundedLoading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedLoading")
            .field("state", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl BoundedLoading {
    pub fn new(config: LoadingConfig) -> Self {
        Self::build(config, Box::new(RandomProgress::new()), None)
    }

    /// Tracker whose timed-out state offers a retry that calls `on_retry`.
    pub fn with_retry<F>(config: LoadingConfig, on_retry: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::build(config, Box::new(RandomProgress::new()), Some(Arc::new(on_retry)))
    }

    /// Replace the progress increment source (e.g. a fixed sequence in tests).
    pub fn with_progress_source<P>(self, source: P) -> Self
    where
        P: ProgressSource + 'static,
    {
        *self.inner.lock_progress() = Box::new(source);
        self
    }

    fn build(
        config: LoadingConfig,
        progress: Box<dyn ProgressSource>,
        on_retry: Option<RetryCallback>,
    ) -> Self {
        let machine = LoadingMachine::new(config, on_retry.is_some());
        Self {
            inner: Arc::new(Inner {
                machine: Mutex::new(machine),
                timers: Mutex::new(Timers::default()),
                progress: Mutex::new(progress),
                on_retry,
            }),
        }
    }

    /// Feed the external loading signal. Must be called inside a tokio runtime.
    pub fn set_loading(&self, loading: bool) {
        self.inner.dispatch(LoadingEvent::Signal(loading));
    }

    /// Re-enter loading after a timeout, if a retry callback was configured.
    pub fn retry(&self) {
        self.inner.dispatch(LoadingEvent::RetryRequested);
    }

    /// Stop both timers regardless of state. Also runs on drop.
    pub fn teardown(&self) {
        self.inner.dispatch(LoadingEvent::Teardown);
    }

    pub fn snapshot(&self) -> LoadingState {
        self.inner.lock_machine().state().clone()
    }

    /// True while a deadline or progress timer is armed.
    pub fn has_active_timers(&self) -> bool {
        let timers = self.inner.lock_timers();
        timers.deadline.is_armed() || timers.progress.is_armed()
    }
}

impl Drop for BoundedLoading {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl Inner {
    fn dispatch(self: &Arc<Self>, event: LoadingEvent) {
        let (commands, estimated) = {
            let mut machine = self.lock_machine();
            let commands = machine.step(event);
            (commands, machine.config().estimated_duration)
        };
        for command in commands {
            self.run(command, estimated);
        }
    }

    fn run(self: &Arc<Self>, command: LoadingCommand, estimated: std::time::Duration) {
        match command {
            LoadingCommand::CancelDeadline => self.lock_timers().deadline.cancel(),
            LoadingCommand::CancelProgress => self.lock_timers().progress.cancel(),
            LoadingCommand::StartDeadline { session, after } => {
                tracing::debug!(
                    session,
                    timeout_ms = after.as_millis() as u64,
                    estimated_ms = estimated.as_millis() as u64,
                    "loading started"
                );
                let weak = Arc::downgrade(self);
                let handle = backoff::schedule_after(after, move || {
                    if let Some(inner) = Weak::upgrade(&weak) {
                        tracing::info!(session, "loading deadline passed");
                        inner.dispatch(LoadingEvent::Deadline { session });
                    }
                });
                self.lock_timers().deadline.replace(handle);
            }
            LoadingCommand::StartProgress { session, every } => {
                let weak = Arc::downgrade(self);
                let handle = backoff::schedule_every(every, move || {
                    if let Some(inner) = Weak::upgrade(&weak) {
                        let increment = inner.lock_progress().next_increment();
                        inner.dispatch(LoadingEvent::Tick { session, increment });
                    }
                });
                self.lock_timers().progress.replace(handle);
            }
            LoadingCommand::InvokeRetry => {
                if let Some(cb) = &self.on_retry {
                    tracing::debug!("loading retry requested");
                    cb();
                }
            }
        }
    }

    fn lock_machine(&self) -> MutexGuard<'_, LoadingMachine> {
        self.machine.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_timers(&self) -> MutexGuard<'_, Timers> {
        self.timers.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_progress(&self) -> MutexGuard<'_, Box<dyn ProgressSource>> {
        self.progress.lock().unwrap_or_else(|e| e.into_inner())
    }
}
