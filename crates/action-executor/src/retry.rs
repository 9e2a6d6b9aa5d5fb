//! Retry policy value object

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Bounded fixed-backoff retry: `attempts` tries with `pause` between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub pause: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, pause: Duration) -> Self {
        Self { attempts, pause }
    }

    /// Attempt numbers, starting at 1.
    pub fn attempt_numbers(&self) -> impl Iterator<Item = u32> {
        1..=self.attempts.max(1)
    }

    /// Whether another attempt follows the given one.
    pub fn has_next(&self, attempt: u32) -> bool {
        attempt < self.attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_numbers_are_one_based_and_bounded() {
        let policy = RetryPolicy::new(3, Duration::from_secs(2));
        let attempts: Vec<u32> = policy.attempt_numbers().collect();
        assert_eq!(attempts, vec![1, 2, 3]);
        assert!(policy.has_next(2));
        assert!(!policy.has_next(3));
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.attempt_numbers().count(), 1);
    }
}
