//! Retry/backoff orchestration around a fallible async operation.
//!
//! [`state`] holds the pure transition function over [`RecoveryState`];
//! [`OperationExecutor`] drives it, running the resulting commands
//! (hooks, notifications, backoff timers) outside of any lock.

mod config;
mod error;
mod run;
mod state;

pub use config::ExecutorConfig;
pub use error::ExecuteError;
pub use run::OperationExecutor;
pub use state::{transition, RecoveryCommand, RecoveryEvent, RecoveryState, Transition};
