//! Cancellation tokens for scheduled callbacks.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::AbortHandle;

const PENDING: u8 = 0;
const FIRED: u8 = 1;
const CANCELLED: u8 = 2;

#[derive(Debug)]
struct HandleInner {
    state: AtomicU8,
    task: Mutex<Option<AbortHandle>>,
}

/// Shared token for one scheduled callback.
///
/// A one-shot callback fires at most once, and never after `cancel` has won
/// the race. Cloning yields another handle to the same timer.
#[derive(Debug, Clone)]
pub struct CancellationHandle {
    inner: Arc<HandleInner>,
}

impl CancellationHandle {
    pub(super) fn new() -> Self {
        Self {
            inner: Arc::new(HandleInner {
                state: AtomicU8::new(PENDING),
                task: Mutex::new(None),
            }),
        }
    }

    pub(super) fn attach(&self, task: AbortHandle) {
        let mut slot = self.inner.task.lock().unwrap_or_else(|e| e.into_inner());
        if self.is_cancelled() {
            task.abort();
        }
        *slot = Some(task);
    }

    /// Claim the right to run a one-shot callback. False once cancelled.
    pub(super) fn try_fire(&self) -> bool {
        self.inner
            .state
            .compare_exchange(PENDING, FIRED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Cancel the timer. Returns true if this call prevented a pending callback.
    /// Idempotent.
    pub fn cancel(&self) -> bool {
        let prevented = self
            .inner
            .state
            .compare_exchange(PENDING, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        let task = self
            .inner
            .task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(task) = task {
            task.abort();
        }
        prevented
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.state.load(Ordering::Acquire) == CANCELLED
    }

    /// True once a one-shot callback has started running.
    pub fn has_fired(&self) -> bool {
        self.inner.state.load(Ordering::Acquire) == FIRED
    }
}

/// Owns at most one timer and cancels it when dropped or replaced.
#[derive(Debug, Default)]
pub struct TimerGuard {
    handle: Option<CancellationHandle>,
}

impl TimerGuard {
    pub fn new(handle: CancellationHandle) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// Cancel the current timer (if any) and take ownership of `handle`.
    pub fn replace(&mut self, handle: CancellationHandle) {
        self.cancel();
        self.handle = Some(handle);
    }

    /// Cancel and forget the current timer.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }

    /// True while holding a timer that has neither fired nor been cancelled.
    pub fn is_armed(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|h| !h.is_cancelled() && !h.has_fired())
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.cancel();
    }
}
