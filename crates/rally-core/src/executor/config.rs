use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::classify::ClassifiedError;

type RetryPredicate = Arc<dyn Fn(&ClassifiedError) -> bool + Send + Sync>;
type ErrorHook = Arc<dyn Fn(&ClassifiedError) + Send + Sync>;
type SuccessHook = Arc<dyn Fn() + Send + Sync>;

/// Retry budget, backoff base, eligibility predicate and hooks for one executor.
#[derive(Clone)]
pub struct ExecutorConfig {
    max_retries: u32,
    base_delay: Duration,
    should_retry: RetryPredicate,
    on_error: Option<ErrorHook>,
    on_success: Option<SuccessHook>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            should_retry: Arc::new(|_| true),
            on_error: None,
            on_success: None,
        }
    }
}

impl fmt::Debug for ExecutorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutorConfig")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("on_error", &self.on_error.is_some())
            .field("on_success", &self.on_success.is_some())
            .finish_non_exhaustive()
    }
}

impl ExecutorConfig {
    /// Total attempts allowed per session, including the first. Zero is
    /// treated as one.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_base_delay_ms(self, ms: u64) -> Self {
        self.with_base_delay(Duration::from_millis(ms))
    }

    pub fn with_should_retry<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&ClassifiedError) -> bool + Send + Sync + 'static,
    {
        self.should_retry = Arc::new(predicate);
        self
    }

    pub fn on_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ClassifiedError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(hook));
        self
    }

    pub fn on_success<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(hook));
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn should_retry(&self, error: &ClassifiedError) -> bool {
        (self.should_retry)(error)
    }

    /// `attempt_count < max_retries && should_retry(error)`.
    pub fn can_retry(&self, attempt_count: u32, error: &ClassifiedError) -> bool {
        attempt_count < self.max_retries && self.should_retry(error)
    }

    pub(super) fn fire_error(&self, error: &ClassifiedError) {
        if let Some(hook) = &self.on_error {
            hook(error);
        }
    }

    pub(super) fn fire_success(&self) {
        if let Some(hook) = &self.on_success {
            hook();
        }
    }
}
