//! Error types used by the scheduling surface and by job executions.
//!
//! This module defines two main error enums:
//!
//! - [`ScheduleError`] — errors raised while registering or scheduling a job.
//! - [`JobError`] — errors raised by individual job executions.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics
//! and additional utilities such as [`JobError::is_retryable`].

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

/// # Errors produced while registering or scheduling jobs.
///
/// These are surfaced synchronously to the calling side: a rejected
/// registration or an invalid schedule never reaches a backend queue.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// A job with the same name is already present in the registry.
    #[error("job \"{name}\" is already registered")]
    DuplicateName {
        /// The conflicting job name.
        name: String,
    },

    /// The requested absolute run time lies in the past.
    #[error("requested run time {due} is in the past (now {now}, tolerance {tolerance:?})")]
    InvalidSchedule {
        /// The requested run time.
        due: DateTime<Utc>,
        /// Wall-clock time at validation.
        now: DateTime<Utc>,
        /// Accepted lateness declared by the backend.
        tolerance: TimeDelta,
    },

    /// The backend refused the execution (queue closed, shutting down, ...).
    #[error("backend rejected the execution: {error}")]
    Backend {
        /// The underlying error message.
        error: String,
    },
}

impl ScheduleError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use jobvisor::ScheduleError;
    ///
    /// let err = ScheduleError::DuplicateName { name: "mailer".into() };
    /// assert_eq!(err.as_label(), "duplicate_name");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ScheduleError::DuplicateName { .. } => "duplicate_name",
            ScheduleError::InvalidSchedule { .. } => "invalid_schedule",
            ScheduleError::Backend { .. } => "backend_rejected",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ScheduleError::DuplicateName { name } => format!("duplicate job name: {name}"),
            ScheduleError::InvalidSchedule { due, now, .. } => {
                format!("run time {due} already passed at {now}")
            }
            ScheduleError::Backend { error } => format!("backend: {error}"),
        }
    }

    pub(crate) fn backend(error: impl Into<String>) -> Self {
        ScheduleError::Backend {
            error: error.into(),
        }
    }
}

/// # Errors produced by job execution.
///
/// These represent failures of individual attempts and, terminally, of a
/// whole execution once its retry budget is spent. Some errors are retryable
/// ([`JobError::Invocation`]), others are final.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum JobError {
    /// The job's action failed for this attempt; may succeed if retried.
    #[error("invocation failed: {error}")]
    Invocation {
        /// The underlying error message.
        error: String,
    },

    /// Non-recoverable error; the execution fails without consuming the
    /// remaining retry budget.
    #[error("fatal error (no retry): {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },

    /// Terminal failure after the last permitted attempt.
    #[error("failed permanently after {attempts} attempt(s): {error}")]
    Exhausted {
        /// Total number of attempts performed.
        attempts: u32,
        /// Message of the last attempt's error.
        error: String,
    },
}

impl JobError {
    /// Shorthand for a retryable invocation failure.
    pub fn invocation(error: impl Into<String>) -> Self {
        JobError::Invocation {
            error: error.into(),
        }
    }

    /// Shorthand for a non-retryable failure.
    pub fn fatal(error: impl Into<String>) -> Self {
        JobError::Fatal {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use jobvisor::JobError;
    ///
    /// let err = JobError::invocation("connection refused");
    /// assert_eq!(err.as_label(), "job_invocation_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            JobError::Invocation { .. } => "job_invocation_failed",
            JobError::Fatal { .. } => "job_fatal",
            JobError::Exhausted { .. } => "job_exhausted",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            JobError::Invocation { error } => format!("error: {error}"),
            JobError::Fatal { error } => format!("fatal: {error}"),
            JobError::Exhausted { attempts, error } => {
                format!("exhausted after {attempts} attempt(s): {error}")
            }
        }
    }

    /// Indicates whether the error type is safe to retry.
    ///
    /// Returns `true` only for [`JobError::Invocation`].
    ///
    /// # Example
    /// ```
    /// use jobvisor::JobError;
    ///
    /// assert!(JobError::invocation("boom").is_retryable());
    /// assert!(!JobError::fatal("nope").is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, JobError::Invocation { .. })
    }
}
