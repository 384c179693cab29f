//! # Function-backed job (`JobFn`)
//!
//! [`JobFn`] wraps a closure `F: Fn(JobArgs) -> Fut`, producing a fresh
//! future per attempt. No shared mutable state between attempts; if a job
//! needs shared state, capture an `Arc<...>` explicitly in the closure.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::JobError;
use crate::jobs::args::JobArgs;
use crate::jobs::job::Job;

/// Function-backed job implementation.
///
/// Wraps a closure that *creates* a new future per attempt.
#[derive(Debug)]
pub struct JobFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> JobFn<F> {
    /// Creates a new function-backed job.
    ///
    /// Prefer [`JobFn::arc`] when you immediately need a [`JobRef`](crate::JobRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the job and returns it as a shared handle.
    ///
    /// ## Example
    /// ```rust
    /// use jobvisor::{JobArgs, JobError, JobFn, JobRef};
    ///
    /// let job: JobRef = JobFn::arc("hello", |_args: JobArgs| async {
    ///     Ok::<_, JobError>(())
    /// });
    /// assert_eq!(job.name(), "hello");
    /// ```
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Job for JobFn<F>
where
    F: Fn(JobArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), JobError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn perform(&self, args: JobArgs) -> Result<(), JobError> {
        (self.f)(args).await
    }
}
