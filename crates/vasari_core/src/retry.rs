//! Retry policy for transient backend failures.

use std::time::Duration;

/// Exponential backoff policy applied per backend.
///
/// Attempt `n` (1-based) that fails transiently waits
/// `base_delay * 2^(n-1)` before the next attempt on the same backend.
///
/// # Examples
///
/// ```
/// use vasari_core::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(3, Duration::from_millis(100));
/// assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(100));
/// assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(200));
/// assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(400));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum attempts per backend, including the first (>= 1)
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles per subsequent attempt
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Creates a new policy. `max_attempts` is clamped to at least 1.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Backoff delay after a transient failure of attempt `n` (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay.saturating_mul(1u32 << exponent)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}
