//! # Global scheduler configuration.
//!
//! Provides [`Config`], the centralized settings for a scheduler instance.
//!
//! Config is used in two ways:
//! 1. **Scheduler creation**: `Scheduler::builder(config)`
//! 2. **JobSpec defaults**: `JobSpec::with_defaults(job, &config)`

use crate::policies::RetryPolicy;

/// Configuration for a scheduler instance.
///
/// ## Field semantics
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by the bus).
///   Slow subscribers that lag behind more than `bus_capacity` events skip
///   the oldest ones.
/// - `default_retry`: policy inherited by
///   [`JobSpec::with_defaults`](crate::JobSpec::with_defaults); `None` means
///   jobs built that way run exactly once.
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,

    /// Default retry policy for specs built with `with_defaults`.
    ///
    /// Can be overridden per-job with [`JobSpec::with_retry`](crate::JobSpec::with_retry).
    pub default_retry: Option<RetryPolicy>,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024` (good baseline)
    /// - `default_retry = None` (jobs run once unless a spec says otherwise)
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            default_retry: None,
        }
    }
}
