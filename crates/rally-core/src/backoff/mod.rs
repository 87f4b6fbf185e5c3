//! Backoff delays and cancellable deferred callbacks.
//!
//! Every timer in the crate (retry backoff, loading deadline, progress ticks)
//! is created here and hands back a [`CancellationHandle`] so owners can tear
//! it down before it fires.

mod delay;
mod handle;
mod scheduler;

pub use delay::backoff_delay;
pub use handle::{CancellationHandle, TimerGuard};
pub use scheduler::{schedule, schedule_after, schedule_every};
