//! Spawn deferred callbacks on the tokio runtime.
//!
//! All functions here must be called from within a runtime context.

use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::delay::backoff_delay;
use super::handle::CancellationHandle;

/// Roughly 30 years; used when a saturated delay would overflow `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

fn deadline_after(delay: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(delay).unwrap_or(now + FAR_FUTURE)
}

/// Schedule `callback` to run once the backoff for `attempt` (1-based) has elapsed.
pub fn schedule<F>(attempt: u32, base_delay: Duration, callback: F) -> CancellationHandle
where
    F: FnOnce() + Send + 'static,
{
    let delay = backoff_delay(attempt, base_delay);
    tracing::trace!(attempt, delay_ms = delay.as_millis() as u64, "backoff scheduled");
    schedule_after(delay, callback)
}

/// Run `callback` once after `delay`, unless cancelled first.
pub fn schedule_after<F>(delay: Duration, callback: F) -> CancellationHandle
where
    F: FnOnce() + Send + 'static,
{
    // Deadline is fixed now, not when the task is first polled.
    let deadline = deadline_after(delay);
    let handle = CancellationHandle::new();
    let token = handle.clone();
    let task = tokio::spawn(async move {
        time::sleep_until(deadline).await;
        if token.try_fire() {
            callback();
        }
    });
    handle.attach(task.abort_handle());
    handle
}

/// Shortest period accepted by [`schedule_every`]; tokio rejects a zero period.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Run `tick` every `period` (first run one period from now) until cancelled.
/// A period below one millisecond is raised to one millisecond.
pub fn schedule_every<F>(period: Duration, mut tick: F) -> CancellationHandle
where
    F: FnMut() + Send + 'static,
{
    let period = period.max(MIN_PERIOD);
    let start = deadline_after(period);
    let handle = CancellationHandle::new();
    let token = handle.clone();
    let task = tokio::spawn(async move {
        let mut ticker = time::interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if token.is_cancelled() {
                break;
            }
            tick();
        }
    });
    handle.attach(task.abort_handle());
    handle
}
