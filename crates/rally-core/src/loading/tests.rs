//! Timer-driven tests for [`BoundedLoading`] on paused tokio time.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

use super::{BoundedLoading, LoadingConfig, LoadingPhase, MAX_SIMULATED_PROGRESS, TIMEOUT_MESSAGE};

async fn settle() {
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
}

async fn advance_ms(ms: u64) {
    time::advance(Duration::from_millis(ms)).await;
    settle().await;
}

/// Cycles through `steps`, counting how often it was asked.
fn cycling(steps: Vec<u8>, calls: Arc<AtomicU32>) -> impl FnMut() -> u8 + Send {
    let mut i = 0;
    move || {
        calls.fetch_add(1, Ordering::SeqCst);
        let v = steps[i % steps.len()];
        i += 1;
        v
    }
}

#[tokio::test(start_paused = true)]
async fn deadline_declares_timeout_while_signal_stays_up() {
    let calls = Arc::new(AtomicU32::new(0));
    let loading = BoundedLoading::new(LoadingConfig::default().with_progress(true))
        .with_progress_source(cycling(vec![3], Arc::clone(&calls)));

    loading.set_loading(true);
    settle().await;
    assert!(loading.snapshot().is_loading);

    advance_ms(29_999).await;
    assert!(!loading.snapshot().has_timed_out);

    advance_ms(1).await;
    let s = loading.snapshot();
    assert!(s.has_timed_out);
    assert!(!s.is_loading);
    assert_eq!(s.phase, LoadingPhase::TimedOut);
    assert_eq!(s.message, TIMEOUT_MESSAGE);
    assert!(!loading.has_active_timers(), "progress timer must stop at timeout");

    let ticks = calls.load(Ordering::SeqCst);
    advance_ms(5_000).await;
    assert_eq!(calls.load(Ordering::SeqCst), ticks);
}

#[tokio::test(start_paused = true)]
async fn simulated_progress_is_monotonic_and_capped() {
    let calls = Arc::new(AtomicU32::new(0));
    let loading = BoundedLoading::new(LoadingConfig::default().with_progress(true))
        .with_progress_source(cycling(vec![7, 0, 14, 2, 11], Arc::clone(&calls)));

    loading.set_loading(true);
    settle().await;
    let mut last = 0;
    for _ in 0..40 {
        advance_ms(200).await;
        let p = loading.snapshot().progress;
        assert!(p >= last, "progress went backwards: {last} -> {p}");
        assert!(p <= MAX_SIMULATED_PROGRESS);
        last = p;
    }
    assert!(calls.load(Ordering::SeqCst) > 0);
    assert_eq!(last, MAX_SIMULATED_PROGRESS);

    loading.set_loading(false);
    let s = loading.snapshot();
    assert_eq!(s.progress, 100);
    assert_eq!(s.phase, LoadingPhase::Settled);
    assert!(!s.has_timed_out);
    assert!(!loading.has_active_timers());
}

#[tokio::test(start_paused = true)]
async fn zero_tick_interval_still_advances_progress() {
    let calls = Arc::new(AtomicU32::new(0));
    let config = LoadingConfig {
        tick_interval: Duration::ZERO,
        ..LoadingConfig::default().with_progress(true)
    };
    let loading =
        BoundedLoading::new(config).with_progress_source(cycling(vec![5], Arc::clone(&calls)));

    loading.set_loading(true);
    settle().await;
    for _ in 0..10 {
        advance_ms(100).await;
    }
    assert!(calls.load(Ordering::SeqCst) > 0);
    assert!(loading.snapshot().progress > 0);

    loading.set_loading(false);
    assert_eq!(loading.snapshot().progress, 100);
    assert!(!loading.has_active_timers());
}

#[tokio::test(start_paused = true)]
async fn settling_before_deadline_prevents_timeout() {
    let loading = BoundedLoading::new(LoadingConfig::default().with_timeout(Duration::from_secs(2)));
    loading.set_loading(true);
    settle().await;
    advance_ms(1_500).await;
    loading.set_loading(false);

    advance_ms(10_000).await;
    let s = loading.snapshot();
    assert_eq!(s.phase, LoadingPhase::Settled);
    assert!(!s.has_timed_out);
}

#[tokio::test(start_paused = true)]
async fn late_completion_keeps_timed_out_state() {
    let loading = BoundedLoading::new(LoadingConfig::default().with_timeout(Duration::from_secs(1)));
    loading.set_loading(true);
    settle().await;
    advance_ms(1_000).await;
    assert!(loading.snapshot().has_timed_out);

    loading.set_loading(false);
    assert_eq!(loading.snapshot().phase, LoadingPhase::TimedOut);

    // A fresh signal starts a new session with a fresh deadline.
    loading.set_loading(true);
    let s = loading.snapshot();
    assert!(s.is_loading);
    assert!(!s.has_timed_out);
    assert_eq!(s.progress, 0);
    advance_ms(999).await;
    assert!(!loading.snapshot().has_timed_out);
    advance_ms(1).await;
    assert!(loading.snapshot().has_timed_out);
}

#[tokio::test(start_paused = true)]
async fn retry_reenters_loading_and_calls_back() {
    let retries = Arc::new(AtomicU32::new(0));
    let r = Arc::clone(&retries);
    let loading = BoundedLoading::with_retry(
        LoadingConfig::default().with_timeout(Duration::from_secs(1)),
        move || {
            r.fetch_add(1, Ordering::SeqCst);
        },
    );
    assert!(loading.snapshot().can_retry);

    loading.set_loading(true);
    settle().await;
    advance_ms(1_000).await;
    assert!(loading.snapshot().has_timed_out);

    loading.retry();
    assert_eq!(retries.load(Ordering::SeqCst), 1);
    let s = loading.snapshot();
    assert_eq!(s.phase, LoadingPhase::Loading);
    assert!(loading.has_active_timers());

    advance_ms(1_000).await;
    assert!(loading.snapshot().has_timed_out);
}

#[tokio::test(start_paused = true)]
async fn retry_without_callback_is_ignored() {
    let loading = BoundedLoading::new(LoadingConfig::default().with_timeout(Duration::from_millis(10)));
    loading.set_loading(true);
    settle().await;
    advance_ms(10).await;
    loading.retry();
    assert_eq!(loading.snapshot().phase, LoadingPhase::TimedOut);
    assert!(!loading.snapshot().can_retry);
}

#[tokio::test(start_paused = true)]
async fn teardown_clears_timers() {
    let calls = Arc::new(AtomicU32::new(0));
    let loading = BoundedLoading::new(LoadingConfig::default().with_progress(true))
        .with_progress_source(cycling(vec![1], Arc::clone(&calls)));
    loading.set_loading(true);
    settle().await;
    advance_ms(400).await;
    assert!(loading.has_active_timers());

    loading.teardown();
    assert!(!loading.has_active_timers());
    let ticks = calls.load(Ordering::SeqCst);
    advance_ms(60_000).await;
    assert_eq!(calls.load(Ordering::SeqCst), ticks);
    let s = loading.snapshot();
    assert!(!s.is_loading);
    assert!(!s.has_timed_out);
}

#[tokio::test(start_paused = true)]
async fn dropping_tracker_stops_ticks() {
    let calls = Arc::new(AtomicU32::new(0));
    let loading = BoundedLoading::new(LoadingConfig::default().with_progress(true))
        .with_progress_source(cycling(vec![1], Arc::clone(&calls)));
    loading.set_loading(true);
    settle().await;
    drop(loading);

    advance_ms(60_000).await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
