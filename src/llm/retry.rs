use crate::constants::MAX_UPSTREAM_RETRY_DELAY_SECS;
use std::time::Duration;

/// Timeout and retry behavior for upstream calls.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included. Never below 1.
    pub max_attempts: u32,
    /// Deadline for each single attempt
    pub timeout: Duration,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for any retry delay
    pub max_delay: Duration,
    /// Growth factor between consecutive delays
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            timeout: Duration::from_secs(60),
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(MAX_UPSTREAM_RETRY_DELAY_SECS),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, timeout: Duration, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            timeout,
            initial_delay,
            ..Self::default()
        }
    }

    /// Delay to wait after the failed attempt `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt.min(i32::MAX as u32) as i32);
        let capped = base.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_makes_a_single_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.timeout, Duration::from_secs(60));
    }

    #[test]
    fn new_never_allows_zero_attempts() {
        let policy = RetryPolicy::new(0, Duration::from_secs(1), Duration::from_millis(10));
        assert_eq!(policy.max_attempts, 1);
    }

    #[test]
    fn delays_grow_and_are_capped() {
        let policy = RetryPolicy {
            max_delay: Duration::from_millis(900),
            ..RetryPolicy::new(5, Duration::from_secs(1), Duration::from_millis(100))
        };
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(800));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(900));
    }
}
