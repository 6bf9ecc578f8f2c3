//! Exponential backoff policy shared by all network destinations
//!
//! One formula drives both the socket reconnect loops and the HTTP retry
//! loops: `min(base * 2^(attempt-1), cap)`. Keeping it here prevents the two
//! destination families from drifting apart.

use std::time::Duration;

/// Default ceiling on any backoff delay, in seconds.
pub const DEFAULT_DELAY_CAP: f64 = 30.0;

/// Delay before the given attempt, in seconds.
///
/// `attempt` is 1-based: the first retry waits `base`, the second `2 * base`,
/// doubling until `cap`. An `attempt` of 0 is treated as 1.
pub fn next_delay(attempt: u32, base: f64, cap: f64) -> f64 {
    let attempt = attempt.max(1);
    // 2^(attempt-1) saturates well past any sane cap; avoid overflow for
    // large attempt counts before the min() is applied.
    let factor = if attempt >= 64 {
        f64::INFINITY
    } else {
        (1u64 << (attempt - 1)) as f64
    };
    (base * factor).min(cap)
}

/// Add uniform random jitter of up to one second.
///
/// Used by WebSocket-style sinks so a fleet of clients does not reconnect in
/// lockstep after a collector restart. Not required for correctness.
pub fn with_jitter(delay: f64) -> f64 {
    delay + rand::random::<f64>()
}

/// Bounded retry policy for a destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts before giving up
    pub max_attempts: u32,
    /// Delay before the first retry, in seconds
    pub base_delay: f64,
    /// Ceiling on any single delay, in seconds
    pub cap: f64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: f64) -> Self {
        Self {
            max_attempts,
            base_delay,
            cap: DEFAULT_DELAY_CAP,
        }
    }

    /// Delay before the given 1-based attempt
    pub fn delay_for(&self, attempt: u32) -> Duration {
        Duration::from_secs_f64(next_delay(attempt, self.base_delay, self.cap))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 1.0)
    }
}

/// Run `op` up to `policy.max_attempts` times, sleeping between failures.
///
/// The delay doubles after each failed attempt, capped at `policy.cap`. The
/// final error is returned once attempts are exhausted; the caller decides
/// how to report it. Blocks the calling thread for the full backoff.
pub fn retry_with_backoff<T, E, F>(policy: &RetryPolicy, mut op: F) -> std::result::Result<T, E>
where
    F: FnMut() -> std::result::Result<T, E>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= max_attempts {
                    return Err(err);
                }
                std::thread::sleep(policy.delay_for(attempt));
                attempt += 1;
            }
        }
    }
}
