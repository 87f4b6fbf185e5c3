pub mod config;
pub mod logging;

pub mod backoff;
pub mod classify;
pub mod executor;
pub mod loading;
pub mod notify;
