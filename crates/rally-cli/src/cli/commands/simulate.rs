//! `rally simulate` – run a scripted operation through the executor while a
//! loading tracker shows progress and the deadline.

use anyhow::Result;
use rally_core::config::RallyConfig;
use rally_core::executor::OperationExecutor;
use rally_core::loading::BoundedLoading;
use rally_core::notify::{Notification, Severity};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::cli::SimulateArgs;

const REPORT_INTERVAL_MS: u64 = 500;

fn print_notification(n: Notification) {
    let tag = match n.severity {
        Severity::Info => "info",
        Severity::Warning => "warn",
        Severity::Error => "error",
    };
    println!("  [{tag}] {}: {}", n.title, n.description);
    tracing::info!(severity = tag, title = %n.title, "notification");
}

pub async fn run_simulate(cfg: &RallyConfig, args: &SimulateArgs) -> Result<()> {
    let mut exec_settings = cfg.executor.clone();
    if let Some(n) = args.max_retries {
        exec_settings.max_retries = n;
    }
    if let Some(ms) = args.base_delay_ms {
        exec_settings.base_delay_ms = ms;
    }
    let mut loading_settings = cfg.loading.clone();
    if let Some(ms) = args.timeout_ms {
        loading_settings.timeout_ms = ms;
    }
    if args.show_progress {
        loading_settings.show_progress = true;
    }

    let executor = OperationExecutor::with_sink(
        exec_settings.to_executor_config(),
        Arc::new(print_notification),
    );
    let loading = Arc::new(BoundedLoading::new(loading_settings.to_loading_config()));

    let reporter = tokio::spawn({
        let loading = Arc::clone(&loading);
        async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(REPORT_INTERVAL_MS));
            loop {
                ticker.tick().await;
                let s = loading.snapshot();
                if s.is_loading {
                    println!("  {:>3}% {}", s.progress, s.message);
                }
            }
        }
    });

    let attempts = Arc::new(AtomicU32::new(0));
    let fail_times = args.fail_times;
    let work = Duration::from_millis(args.work_ms);
    let error = args.error.clone();

    loading.set_loading(true);
    let result = executor
        .execute(
            || {
                let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                let error = error.clone();
                async move {
                    tokio::time::sleep(work).await;
                    if n <= fail_times {
                        Err(error)
                    } else {
                        Ok(n)
                    }
                }
            },
            args.context.as_deref(),
        )
        .await;
    let timed_out_before_done = loading.snapshot().has_timed_out;
    loading.set_loading(false);
    reporter.abort();

    match &result {
        Ok(n) => println!("succeeded on attempt {n}"),
        Err(e) => println!("failed: {e}"),
    }
    if timed_out_before_done {
        println!("loading deadline passed before the operation finished");
    }

    let recovery = executor.snapshot();
    let presentation = loading.snapshot();
    if args.json {
        let out = serde_json::json!({
            "recovery": recovery,
            "loading": presentation,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "recovery: attempts={} can_retry={} recovering={}",
            recovery.attempt_count, recovery.can_retry, recovery.is_recovering
        );
        println!(
            "loading:  phase={:?} progress={} timed_out={}",
            presentation.phase, presentation.progress, presentation.has_timed_out
        );
    }
    Ok(())
}
