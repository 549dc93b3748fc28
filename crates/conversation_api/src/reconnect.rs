use std::time::Duration;

/// Base delay before the first reconnect attempt.
pub const BASE_DELAY_MS: u64 = 1000;
/// Ceiling on the reconnect delay.
pub const MAX_DELAY_MS: u64 = 30_000;

/// Capped exponential backoff delay for the n-th consecutive failure.
///
/// Retries are unbounded: an agent session may be long-lived and
/// intermittently unreachable, and a retry cap would silently stop all
/// updates. The counter resets to zero on every successfully decoded batch.
#[must_use]
pub fn reconnect_delay(retry: u32) -> Duration {
    let exponent = retry.min(30);
    let delay = BASE_DELAY_MS.saturating_mul(2u64.saturating_pow(exponent));
    Duration::from_millis(delay.min(MAX_DELAY_MS))
}
