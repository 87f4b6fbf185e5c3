//! Bounded loading presentation state.
//!
//! Tracks whether something is loading, fakes incremental progress, and
//! declares a timeout when the loading signal stays up past a deadline,
//! whether or not the underlying work has finished.

mod config;
mod driver;
mod machine;
mod progress;
mod state;

pub use config::LoadingConfig;
pub use driver::BoundedLoading;
pub use machine::{LoadingCommand, LoadingEvent, LoadingMachine};
pub use progress::{ProgressSource, RandomProgress};
pub use state::{LoadingPhase, LoadingState, MAX_SIMULATED_PROGRESS, TIMEOUT_MESSAGE};

#[cfg(test)]
mod tests;
