//! # Job specification.
//!
//! Defines [`JobSpec`], the immutable bundle handed to the scheduler: the job
//! itself plus its optional retry policy. A spec without a policy runs
//! exactly once.
//!
//! A spec can be created:
//! - **Explicitly** with [`JobSpec::new`] / [`JobSpec::with_retry`]
//! - **From config** with [`JobSpec::with_defaults`] (inherit the
//!   configured default policy)

use crate::config::Config;
use crate::jobs::job::JobRef;
use crate::policies::RetryPolicy;

/// Immutable description of a schedulable unit of work.
///
/// Cheap to clone: the job itself is behind an `Arc`.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use jobvisor::{Backoff, JobArgs, JobError, JobFn, JobSpec, RetryPolicy};
///
/// let spec = JobSpec::new(JobFn::arc("cleanup", |_args: JobArgs| async {
///     Ok::<_, JobError>(())
/// }))
/// .with_retry(RetryPolicy::new(3, Backoff::fixed(Duration::from_secs(1))));
///
/// assert_eq!(spec.name(), "cleanup");
/// assert_eq!(spec.max_attempts(), 3);
/// ```
#[derive(Clone)]
pub struct JobSpec {
    job: JobRef,
    retry: Option<RetryPolicy>,
}

impl JobSpec {
    /// Creates a spec with no retry policy: one attempt only.
    pub fn new(job: JobRef) -> Self {
        Self { job, retry: None }
    }

    /// Creates a spec inheriting the default retry policy from `cfg`.
    pub fn with_defaults(job: JobRef, cfg: &Config) -> Self {
        Self {
            job,
            retry: cfg.default_retry,
        }
    }

    /// Returns a new spec with the given retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Returns reference to the job.
    pub fn job(&self) -> &JobRef {
        &self.job
    }

    /// Convenience: returns the job name.
    pub fn name(&self) -> &str {
        self.job.name()
    }

    /// Returns the retry policy, if configured.
    pub fn retry(&self) -> Option<&RetryPolicy> {
        self.retry.as_ref()
    }

    /// Total attempt budget: the policy's `max_attempts`, or 1 without one.
    pub fn max_attempts(&self) -> u32 {
        self.retry.map_or(1, |p| p.max_attempts)
    }
}
