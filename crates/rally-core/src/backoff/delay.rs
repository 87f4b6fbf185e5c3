use std::time::Duration;

/// Largest exponent applied; keeps the shift in range for absurd attempt numbers.
const MAX_EXPONENT: u32 = 31;

/// Delay before retry number `attempt` (1-based): `base * 2^(attempt - 1)`.
///
/// Attempt 0 is treated like attempt 1. The multiplication saturates instead
/// of overflowing.
pub fn backoff_delay(attempt: u32, base: Duration) -> Duration {
    let exp = attempt.saturating_sub(1).min(MAX_EXPONENT);
    base.saturating_mul(1u32 << exp)
}
