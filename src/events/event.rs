//! # Lifecycle events emitted by the scheduler and retry coordinator.
//!
//! The [`EventKind`] enum classifies events across three categories:
//! - **Scheduling events**: an execution was handed to a backend
//!   (enqueued now, or scheduled for later)
//! - **Attempt events**: execution flow of a single attempt
//! - **Terminal events**: final outcome of a whole execution
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! job name, attempt numbers, delays and failure reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use jobvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::AttemptFailed)
//!     .with_job("mailer")
//!     .with_attempt(2)
//!     .with_reason("connection refused");
//!
//! assert_eq!(ev.kind, EventKind::AttemptFailed);
//! assert_eq!(ev.job.as_deref(), Some("mailer"));
//! assert_eq!(ev.reason.as_deref(), Some("connection refused"));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Scheduling events ===
    /// Execution handed to the backend for immediate pickup.
    ///
    /// Sets: `job`, `at`, `seq`.
    JobEnqueued,

    /// Execution handed to the backend for a future run time.
    ///
    /// Sets: `job`, `due`, `at`, `seq`.
    JobScheduled,

    // === Attempt events ===
    /// An attempt is starting.
    ///
    /// Sets: `job`, `attempt` (1-based), `at`, `seq`.
    AttemptStarted,

    /// An attempt failed; the coordinator decides retry-vs-final next.
    ///
    /// Sets: `job`, `attempt`, `reason`, `at`, `seq`.
    AttemptFailed,

    /// A retry was scheduled for a failed execution.
    ///
    /// Sets: `job`, `attempt` (the upcoming attempt), `delay_ms`, `reason`
    /// (last failure), `at`, `seq`.
    RetryScheduled,

    // === Terminal events ===
    /// The execution succeeded.
    ///
    /// Sets: `job`, `attempt` (the successful one), `at`, `seq`.
    JobSucceeded,

    /// The execution failed permanently: its budget is spent or the last
    /// error was fatal. Never followed by another attempt.
    ///
    /// Sets: `job`, `attempt` (total attempts), `reason` (last error),
    /// `at`, `seq`.
    JobFailed,
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the job, if applicable.
    pub job: Option<Arc<str>>,
    /// Attempt count (starting from 1).
    pub attempt: Option<u32>,
    /// Backoff delay before the next attempt in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Requested run time for scheduled executions.
    pub due: Option<DateTime<Utc>>,
    /// Human-readable reason (errors, rejection details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            job: None,
            attempt: None,
            delay_ms: None,
            due: None,
            reason: None,
        }
    }

    /// Attaches a job name.
    #[inline]
    pub fn with_job(mut self, job: impl Into<Arc<str>>) -> Self {
        self.job = Some(job.into());
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a backoff delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches a requested run time.
    #[inline]
    pub fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(due);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// True for terminal outcomes ([`JobSucceeded`](EventKind::JobSucceeded)
    /// or [`JobFailed`](EventKind::JobFailed)).
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, EventKind::JobSucceeded | EventKind::JobFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::JobEnqueued);
        let b = Event::new(EventKind::JobEnqueued);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_delay_is_clamped_to_u32() {
        let ev = Event::new(EventKind::RetryScheduled)
            .with_delay(Duration::from_millis(u64::from(u32::MAX) + 1000));
        assert_eq!(ev.delay_ms, Some(u32::MAX));
    }

    #[test]
    fn test_terminal_classification() {
        assert!(Event::new(EventKind::JobFailed).is_terminal());
        assert!(Event::new(EventKind::JobSucceeded).is_terminal());
        assert!(!Event::new(EventKind::AttemptFailed).is_terminal());
    }
}
