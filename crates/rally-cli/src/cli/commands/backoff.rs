//! `rally backoff` – print the retry delay schedule.

use rally_core::backoff::backoff_delay;
use rally_core::config::RallyConfig;
use std::time::Duration;

pub fn run_backoff(cfg: &RallyConfig, max_retries: Option<u32>, base_delay_ms: Option<u64>) {
    let max = max_retries.unwrap_or(cfg.executor.max_retries).max(1);
    let base = Duration::from_millis(base_delay_ms.unwrap_or(cfg.executor.base_delay_ms));

    println!("{:<8} {:>12} {:>12}", "RETRY", "DELAY(ms)", "ELAPSED(ms)");
    let mut elapsed: u128 = 0;
    // Attempt n failing schedules retry n; the last attempt schedules nothing.
    for n in 1..max {
        let delay = backoff_delay(n, base).as_millis();
        elapsed += delay;
        println!("{:<8} {:>12} {:>12}", n, delay, elapsed);
    }
    if max == 1 {
        println!("(single attempt, no retries)");
    }
}
