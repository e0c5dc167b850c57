//! Bounded retry with fixed backoff.
//!
//! Transient storage failures during balance-row initialization are retried
//! a small, bounded number of times. Ordinary ledger updates never retry; a
//! failure there surfaces immediately to the caller.

use crate::msg_debug;
use std::thread;
use std::time::Duration;

/// Attempt count and fixed delay between attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay_ms: u64) -> Self {
        Self {
            attempts: attempts.max(1),
            delay: Duration::from_millis(delay_ms),
        }
    }
}

/// Runs `op` until it succeeds or the attempts are exhausted, sleeping the
/// fixed delay between attempts. The final error is returned unchanged.
pub fn with_retry<T, E, F>(policy: RetryPolicy, mut op: F) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Result<T, E>,
{
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.attempts => {
                msg_debug!(format!("attempt {}/{} failed: {}", attempt, policy.attempts, err));
                attempt += 1;
                thread::sleep(policy.delay);
            }
            Err(err) => return Err(err),
        }
    }
}
