//! Bounded retry for outputs held by another process.
//!
//! Rendering itself never retries. The caller wraps a single render call in
//! [`with_retry`], which repeats it only while the error is retriable
//! (a busy destination) and gives up after a fixed number of attempts.

use crate::error::RenderError;
use log::{debug, warn};
use std::thread;
use std::time::Duration;

/// How many times to attempt an operation and how long to wait between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts, delay }
    }

    /// A single attempt, no waiting
    pub fn once() -> Self {
        Self { max_attempts: 1, delay: Duration::ZERO }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, delay: Duration::from_millis(500) }
    }
}

/// Determine if a failed attempt should be repeated.
///
/// Returns true if the error is retriable and attempts remain.
pub fn should_retry(error: &RenderError, attempt: u32, policy: &RetryPolicy) -> bool {
    error.is_retriable() && attempt < policy.max_attempts.max(1)
}

/// Run `op`, repeating it while it fails with a retriable error.
///
/// Returns the first success or the last error.
pub fn with_retry<T, F>(policy: &RetryPolicy, mut op: F) -> Result<T, RenderError>
where
    F: FnMut() -> Result<T, RenderError>,
{
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => {
                if attempt > 1 {
                    debug!("Succeeded on attempt {}", attempt);
                }
                return Ok(value);
            }
            Err(e) if should_retry(&e, attempt, policy) => {
                warn!("Attempt {}/{} failed: {}; retrying in {:?}", attempt, policy.max_attempts, e, policy.delay);
                thread::sleep(policy.delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
