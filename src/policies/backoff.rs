//! # Backoff calculator for retrying jobs.
//!
//! [`Backoff`] maps an upcoming attempt number to the delay that must elapse
//! before that attempt runs. It comes in two shapes:
//! - [`Backoff::Fixed`] the same delay for every retry;
//! - [`Backoff::Exponential`] the base delay doubled per attempt, optionally capped.
//!
//! The calculator is a pure function of `(self, attempt)`: no state is carried
//! between calls, so a retry chain can be resumed anywhere and still produce
//! the same delay sequence. Arithmetic is integer milliseconds and saturating;
//! an uncapped exponential curve is clamped to [`Backoff::UNBOUNDED_CAP`]
//! so intermediate multiplication can never overflow.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use jobvisor::Backoff;
//!
//! let backoff = Backoff::exponential_capped(Duration::from_secs(1), Duration::from_secs(8));
//!
//! // Attempt 1 — the base delay, no doubling before the first retry.
//! assert_eq!(backoff.next_delay(1), Duration::from_secs(1));
//! // Attempt 3 — 1s × 2² = 4s.
//! assert_eq!(backoff.next_delay(3), Duration::from_secs(4));
//! // Attempt 5 — 16s, capped at 8s.
//! assert_eq!(backoff.next_delay(5), Duration::from_secs(8));
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Delay policy applied between retry attempts.
///
/// `attempt` in [`Backoff::next_delay`] is always the *upcoming* attempt
/// number (1-based): the wait before attempt `k` is `next_delay(k)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Backoff {
    /// Constant delay, independent of the attempt number.
    Fixed {
        /// Delay before every retry.
        delay: Duration,
    },
    /// Delay doubling per attempt: `delay × 2^(attempt-1)`, clamped to `max`
    /// when given (or to [`Backoff::UNBOUNDED_CAP`] otherwise).
    Exponential {
        /// Base delay, used as-is for attempt 1.
        delay: Duration,
        /// Optional cap. When `max < delay` the cap still wins.
        max: Option<Duration>,
    },
}

impl Backoff {
    /// Clamp applied to an uncapped exponential curve (~49.7 days).
    pub const UNBOUNDED_CAP: Duration = Duration::from_millis(u32::MAX as u64);

    /// Constant delay for every retry.
    pub fn fixed(delay: Duration) -> Self {
        Backoff::Fixed { delay }
    }

    /// Doubling delay without an explicit cap.
    pub fn exponential(delay: Duration) -> Self {
        Backoff::Exponential { delay, max: None }
    }

    /// Doubling delay clamped to `max`.
    pub fn exponential_capped(delay: Duration, max: Duration) -> Self {
        Backoff::Exponential {
            delay,
            max: Some(max),
        }
    }

    /// Computes the delay before the given attempt (1-based).
    ///
    /// - `Fixed` returns the configured delay unconditionally.
    /// - `Exponential` returns `min(delay × 2^(attempt-1), cap)` where `cap`
    ///   is `max` or [`Backoff::UNBOUNDED_CAP`]. The sequence is
    ///   non-decreasing in `attempt`.
    ///
    /// An `attempt` of 0 is treated as 1.
    pub fn next_delay(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::Fixed { delay } => delay,
            Backoff::Exponential { delay, max } => {
                let base = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                // Shift exponent clamped to 63; anything past that saturates anyway.
                let exp = attempt.saturating_sub(1).min(63);
                let raw = base.saturating_mul(1u64 << exp);

                let cap = max.unwrap_or(Self::UNBOUNDED_CAP);
                let cap_ms = u64::try_from(cap.as_millis()).unwrap_or(u64::MAX);
                Duration::from_millis(raw.min(cap_ms))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_is_constant_for_all_attempts() {
        let backoff = Backoff::fixed(Duration::from_millis(250));
        for attempt in 1..=20 {
            assert_eq!(
                backoff.next_delay(attempt),
                Duration::from_millis(250),
                "attempt {} should stay at 250ms",
                attempt
            );
        }
    }

    #[test]
    fn test_exponential_doubles_from_base() {
        let backoff = Backoff::exponential(Duration::from_millis(100));
        assert_eq!(backoff.next_delay(1), Duration::from_millis(100));
        assert_eq!(backoff.next_delay(2), Duration::from_millis(200));
        assert_eq!(backoff.next_delay(3), Duration::from_millis(400));
        assert_eq!(backoff.next_delay(4), Duration::from_millis(800));
    }

    #[test]
    fn test_exponential_capped_sequence() {
        let backoff =
            Backoff::exponential_capped(Duration::from_millis(1000), Duration::from_millis(8000));
        let delays: Vec<u64> = (1..=5)
            .map(|k| backoff.next_delay(k).as_millis() as u64)
            .collect();
        assert_eq!(delays, vec![1000, 2000, 4000, 8000, 8000]);
    }

    #[test]
    fn test_exponential_is_non_decreasing() {
        let backoff =
            Backoff::exponential_capped(Duration::from_millis(30), Duration::from_secs(60));
        let mut prev = Duration::ZERO;
        for attempt in 1..=80 {
            let delay = backoff.next_delay(attempt);
            assert!(
                delay >= prev,
                "attempt {}: {:?} < previous {:?}",
                attempt,
                delay,
                prev
            );
            prev = delay;
        }
    }

    #[test]
    fn test_cap_below_base_returns_cap() {
        let backoff =
            Backoff::exponential_capped(Duration::from_secs(10), Duration::from_secs(5));
        assert_eq!(backoff.next_delay(1), Duration::from_secs(5));
    }

    #[test]
    fn test_uncapped_clamps_to_sentinel() {
        let backoff = Backoff::exponential(Duration::from_secs(1));
        assert_eq!(backoff.next_delay(64), Backoff::UNBOUNDED_CAP);
        assert_eq!(backoff.next_delay(u32::MAX), Backoff::UNBOUNDED_CAP);
    }

    #[test]
    fn test_huge_attempt_saturates_at_cap() {
        let backoff =
            Backoff::exponential_capped(Duration::from_millis(100), Duration::from_secs(60));
        assert_eq!(backoff.next_delay(100), Duration::from_secs(60));
    }

    #[test]
    fn test_attempt_zero_treated_as_first() {
        let backoff = Backoff::exponential(Duration::from_millis(100));
        assert_eq!(backoff.next_delay(0), Duration::from_millis(100));
    }

    #[test]
    fn test_zero_delay_stays_zero() {
        let backoff = Backoff::exponential(Duration::ZERO);
        for attempt in 1..=10 {
            assert_eq!(backoff.next_delay(attempt), Duration::ZERO);
        }
    }

    #[test]
    fn test_serde_round_trip() {
        let backoff =
            Backoff::exponential_capped(Duration::from_millis(500), Duration::from_secs(30));
        let json = serde_json::to_string(&backoff).unwrap();
        let parsed: Backoff = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, backoff);
    }
}
