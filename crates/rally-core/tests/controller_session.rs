//! Integration test: one caller drives an executor and a loading tracker side by side.
//!
//! Uses paused tokio time so backoff delays and the loading deadline resolve
//! instantly and deterministically.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rally_core::classify::ErrorKind;
use rally_core::config::RallyConfig;
use rally_core::executor::{ExecuteError, OperationExecutor};
use rally_core::loading::{BoundedLoading, LoadingPhase};
use rally_core::notify::{Notification, NotificationSink};

fn recording_sink() -> (Arc<Mutex<Vec<Notification>>>, Arc<dyn NotificationSink>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&seen);
    (
        seen,
        Arc::new(move |n: Notification| s.lock().unwrap().push(n)),
    )
}

#[tokio::test(start_paused = true)]
async fn retries_finish_inside_deadline_and_loading_settles() {
    let cfg = RallyConfig::default();
    let (seen, sink) = recording_sink();
    let executor = OperationExecutor::with_sink(cfg.executor.to_executor_config(), sink);
    let loading = BoundedLoading::new(cfg.loading.to_loading_config().with_progress(true));

    let attempts = Arc::new(AtomicU32::new(0));
    let a = Arc::clone(&attempts);
    loading.set_loading(true);
    let result = executor
        .execute(
            move || {
                let n = a.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    if n < 3 {
                        Err(format!("HTTP 500 on attempt {n}"))
                    } else {
                        Ok("validated")
                    }
                }
            },
            Some("Validating membership"),
        )
        .await;
    loading.set_loading(false);

    assert_eq!(result, Ok("validated"));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert!(executor.snapshot().is_zero());

    let s = loading.snapshot();
    assert_eq!(s.phase, LoadingPhase::Settled);
    assert_eq!(s.progress, 100);
    assert!(!loading.has_active_timers());
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn late_result_updates_recovery_but_not_timed_out_loading() {
    let cfg = RallyConfig::default();
    let executor = OperationExecutor::with_sink(
        cfg.executor.to_executor_config(),
        Arc::new(rally_core::notify::NullSink),
    );
    let loading = BoundedLoading::new(cfg.loading.to_loading_config());

    loading.set_loading(true);
    let result = executor
        .execute(
            || async {
                tokio::time::sleep(Duration::from_secs(40)).await;
                Ok::<_, String>(99)
            },
            None,
        )
        .await;

    // The deadline fired at 30s while the operation was still running.
    assert!(loading.snapshot().has_timed_out);
    loading.set_loading(false);

    assert_eq!(result, Ok(99));
    assert!(executor.snapshot().is_zero());
    let s = loading.snapshot();
    assert_eq!(s.phase, LoadingPhase::TimedOut);
    assert!(!s.is_loading);
}

#[tokio::test(start_paused = true)]
async fn configured_no_retry_kinds_stop_the_session() {
    let cfg: RallyConfig = toml::from_str(
        r#"
        [executor]
        max_retries = 4
        no_retry_kinds = ["not_found"]
        "#,
    )
    .unwrap();
    let (seen, sink) = recording_sink();
    let executor = OperationExecutor::with_sink(cfg.executor.to_executor_config(), sink);

    let result = executor
        .execute(
            || async { Err::<(), _>("Request failed: 404 Not Found") },
            Some("Searching medicines"),
        )
        .await;

    match result {
        Err(ExecuteError::Failed(e)) => {
            assert_eq!(e.kind(), ErrorKind::NotFound);
            assert_eq!(
                e.message(),
                "Searching medicines: The requested resource was not found."
            );
        }
        other => panic!("expected terminal failure, got {other:?}"),
    }
    assert!(!executor.snapshot().can_retry);
    assert_eq!(seen.lock().unwrap().len(), 1);
}
