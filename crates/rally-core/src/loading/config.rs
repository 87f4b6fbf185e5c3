use std::time::Duration;

/// Loading deadline and progress simulation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingConfig {
    pub timeout: Duration,
    pub show_progress: bool,
    /// Informational only; reported when loading starts.
    pub estimated_duration: Duration,
    pub loading_message: String,
    /// Period of the simulated progress tick. Values below one millisecond
    /// run at one millisecond.
    pub tick_interval: Duration,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(30_000),
            show_progress: false,
            estimated_duration: Duration::from_millis(5_000),
            loading_message: "Loading...".to_string(),
            tick_interval: Duration::from_millis(200),
        }
    }
}

impl LoadingConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn with_estimated_duration(mut self, estimated: Duration) -> Self {
        self.estimated_duration = estimated;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.loading_message = message.into();
        self
    }

    /// Zero is bumped to one millisecond; tokio intervals reject a zero period.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval.max(Duration::from_millis(1));
        self
    }
}
