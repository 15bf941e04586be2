use std::time::Duration;

/// Wait before poll `attempt + 1`, after `attempt` polls have come back non-terminal.
///
/// Attempt 1: `interval`
/// Attempt 2: `2 * interval`
/// Attempt n: `interval * 2^(n-1)`, capped at `max_interval`
///
/// With `max_interval <= interval` the wait is fixed.
pub fn poll_delay(interval: Duration, max_interval: Duration, attempt: u32) -> Duration {
    if max_interval <= interval {
        return interval;
    }
    let shift = attempt.saturating_sub(1).min(31);
    interval
        .checked_mul(1u32 << shift)
        .map_or(max_interval, |d| d.min(max_interval))
}
