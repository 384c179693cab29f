//! # Retry policy: attempt budget plus delay strategy.
//!
//! [`RetryPolicy`] bundles the maximum number of attempts with a [`Backoff`]
//! calculator and an optional [`JitterPolicy`]. A job without a policy runs
//! exactly once.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::policies::{Backoff, JitterPolicy};

/// Retry budget and delay strategy for one job.
///
/// ## Field semantics
/// - `max_attempts`: total attempts including the first one; never below 1
///   (clamped by [`RetryPolicy::new`]).
/// - `backoff`: pure delay calculator consulted before each retry.
/// - `jitter`: randomization applied on top of the computed delay
///   (default [`JitterPolicy::None`]).
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use jobvisor::{Backoff, RetryPolicy};
///
/// let policy = RetryPolicy::new(3, Backoff::fixed(Duration::from_secs(2)));
/// assert_eq!(policy.max_attempts, 3);
/// assert_eq!(policy.delay_for(2), Duration::from_secs(2));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempt budget, including the first attempt (`>= 1`).
    pub max_attempts: u32,
    /// Delay calculator consulted between attempts.
    pub backoff: Backoff,
    /// Randomization applied to computed delays.
    #[serde(default)]
    pub jitter: JitterPolicy,
}

impl RetryPolicy {
    /// Creates a policy with the given budget and backoff, no jitter.
    ///
    /// `max_attempts` is clamped to a minimum of 1.
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
            jitter: JitterPolicy::None,
        }
    }

    /// Returns a new policy with the given jitter.
    pub fn with_jitter(mut self, jitter: JitterPolicy) -> Self {
        self.jitter = jitter;
        self
    }

    /// Computes the wait before the given attempt (1-based), jitter applied.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.jitter.apply(self.backoff.next_delay(attempt))
    }
}

impl Default for RetryPolicy {
    /// Single attempt with the default exponential curve: equivalent to "no
    /// retry" until `max_attempts` is raised.
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff: Backoff::exponential_capped(
                Duration::from_millis(100),
                Duration::from_secs(30),
            ),
            jitter: JitterPolicy::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_attempts_clamped_to_one() {
        let policy = RetryPolicy::new(0, Backoff::fixed(Duration::from_millis(10)));
        assert_eq!(policy.max_attempts, 1);
    }

    #[test]
    fn test_delay_for_uses_backoff_without_jitter() {
        let policy = RetryPolicy::new(
            5,
            Backoff::exponential_capped(Duration::from_millis(100), Duration::from_secs(1)),
        );
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(5), Duration::from_secs(1));
    }

    #[test]
    fn test_jitter_bounds_respected() {
        let policy = RetryPolicy::new(3, Backoff::fixed(Duration::from_millis(800)))
            .with_jitter(JitterPolicy::Equal);
        for _ in 0..100 {
            let delay = policy.delay_for(2);
            assert!(delay >= Duration::from_millis(400));
            assert!(delay <= Duration::from_millis(800));
        }
    }
}
