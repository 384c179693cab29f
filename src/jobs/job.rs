//! # Job abstraction.
//!
//! Defines the [`Job`] trait: a named, asynchronous unit of work invoked with
//! an ordered argument snapshot. The common handle type is [`JobRef`], an
//! `Arc<dyn Job>` suitable for sharing across the scheduler and backends.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::JobError;
use crate::jobs::args::JobArgs;

/// Shared handle to a job (`Arc<dyn Job>`).
pub type JobRef = Arc<dyn Job>;

/// # Named, asynchronous unit of deferred work.
///
/// A `Job` has a stable [`name`](Job::name) used for logging and metrics
/// correlation, and an async [`perform`](Job::perform) method invoked with
/// the arguments captured at scheduling time.
///
/// A failing attempt returns [`JobError::Invocation`] (retryable) or
/// [`JobError::Fatal`] (never retried). Argument mismatches are detected
/// here, at execution time, via [`JobArgs::arg`].
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use jobvisor::{Job, JobArgs, JobError};
///
/// struct SendMail;
///
/// #[async_trait]
/// impl Job for SendMail {
///     fn name(&self) -> &str { "send_mail" }
///
///     async fn perform(&self, args: JobArgs) -> Result<(), JobError> {
///         let recipient: String = args.arg(0)?;
///         // deliver to `recipient`...
///         # let _ = recipient;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Job: Send + Sync + 'static {
    /// Returns a stable, human-readable job name.
    fn name(&self) -> &str;

    /// Executes one attempt with the given arguments.
    async fn perform(&self, args: JobArgs) -> Result<(), JobError>;
}
