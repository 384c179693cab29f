//! # Retry coordinator.
//!
//! Runs attempts and drives the per-execution state machine:
//!
//! ```text
//! Pending ──► Running ──► Succeeded                       (terminal)
//!                │
//!                ├──► Pending (attempt+1, due = now+delay) if retryable
//!                │                                         and budget left
//!                └──► Failed                               (terminal)
//! ```
//!
//! ## Rules
//! - One call to [`Coordinator::dispatch`] runs exactly **one** attempt;
//!   retries are re-enqueued through the backend rather than looped
//!   in-process, so a queued execution's remaining budget survives anything
//!   the backend's persistence survives.
//! - [`Coordinator::run_inline`] (the `perform_now` path) instead retries in
//!   place, sleeping the same computed delays, so inline and queued retries
//!   have identical timing semantics.
//! - A panicking job is caught and treated as fatal; it can never take the
//!   worker down with it.
//! - Terminal failures are always published with the total attempt count and
//!   the last error.
//!
//! ## Event flow per attempt
//! ```text
//! AttemptStarted → [perform] → JobSucceeded             (success)
//!                            → AttemptFailed
//!                                ├─► RetryScheduled     (budget left)
//!                                └─► JobFailed          (terminal)
//! ```

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::FutureExt;

use crate::error::JobError;
use crate::events::{Bus, Event, EventKind};
use crate::core::backend::Backend;
use crate::core::execution::{to_delta, Execution};

/// Outcome of a single [`Coordinator::dispatch`] call.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The attempt succeeded; `attempts` is the total count used.
    Succeeded {
        /// Number of attempts performed, including the successful one.
        attempts: u32,
    },
    /// The attempt failed and the next one was queued through the backend.
    Retried {
        /// When the next attempt becomes eligible.
        due: DateTime<Utc>,
    },
    /// The execution failed permanently.
    Failed {
        /// Terminal error carrying total attempts and the last failure.
        error: JobError,
    },
}

/// Orchestrates attempts, consults the retry policy, resubmits retries.
pub struct Coordinator {
    bus: Bus,
}

impl Coordinator {
    /// Creates a coordinator publishing to the given bus.
    pub fn new(bus: Bus) -> Self {
        Self { bus }
    }

    /// Runs one attempt of `exec`.
    ///
    /// On a retryable failure with budget left, computes the next delay,
    /// advances the execution to its next attempt and hands it back to
    /// `backend` via [`Backend::enqueue_at`]. Otherwise the failure is
    /// terminal.
    pub async fn dispatch(&self, mut exec: Execution, backend: &dyn Backend) -> DispatchOutcome {
        match self.run_attempt(&mut exec).await {
            Ok(()) => DispatchOutcome::Succeeded {
                attempts: exec.attempt(),
            },
            Err(err) if err.is_retryable() && exec.has_budget() => {
                let attempts_done = exec.attempt();
                let next_attempt = attempts_done + 1;
                let delay = exec
                    .job()
                    .retry()
                    .map(|p| p.delay_for(next_attempt))
                    .unwrap_or_default();
                let due = Utc::now()
                    .checked_add_signed(to_delta(delay))
                    .unwrap_or(DateTime::<Utc>::MAX_UTC);
                let name = exec.job().name().to_string();

                exec.reschedule(due);
                self.bus.publish(
                    Event::new(EventKind::RetryScheduled)
                        .with_job(name.as_str())
                        .with_attempt(next_attempt)
                        .with_delay(delay)
                        .with_reason(err.to_string()),
                );

                match backend.enqueue_at(due, exec).await {
                    Ok(()) => DispatchOutcome::Retried { due },
                    Err(requeue_err) => {
                        let error = JobError::Exhausted {
                            attempts: attempts_done,
                            error: format!("retry could not be scheduled: {requeue_err}"),
                        };
                        self.publish_failed(&name, attempts_done, &error);
                        DispatchOutcome::Failed { error }
                    }
                }
            }
            Err(err) => DispatchOutcome::Failed {
                error: self.fail_terminally(&mut exec, err),
            },
        }
    }

    /// Runs `exec` to completion in place, the `perform_now` path.
    ///
    /// Suspends the caller through every retry, sleeping the same delays the
    /// queued path would wait.
    pub async fn run_inline(&self, mut exec: Execution) -> Result<(), JobError> {
        loop {
            match self.run_attempt(&mut exec).await {
                Ok(()) => return Ok(()),
                Err(err) if err.is_retryable() && exec.has_budget() => {
                    let next_attempt = exec.attempt() + 1;
                    let delay = exec
                        .job()
                        .retry()
                        .map(|p| p.delay_for(next_attempt))
                        .unwrap_or_default();
                    self.bus.publish(
                        Event::new(EventKind::RetryScheduled)
                            .with_job(exec.job().name())
                            .with_attempt(next_attempt)
                            .with_delay(delay)
                            .with_reason(err.to_string()),
                    );

                    tokio::time::sleep(delay).await;
                    exec.reschedule(Utc::now());
                }
                Err(err) => return Err(self.fail_terminally(&mut exec, err)),
            }
        }
    }

    /// Executes one attempt, publishing its lifecycle events.
    ///
    /// Always publishes exactly one of `JobSucceeded` / `AttemptFailed`.
    async fn run_attempt(&self, exec: &mut Execution) -> Result<(), JobError> {
        let job = Arc::clone(exec.job().job());
        let args = exec.args().clone();
        let attempt = exec.attempt();

        exec.mark_running();
        self.bus.publish(
            Event::new(EventKind::AttemptStarted)
                .with_job(job.name())
                .with_attempt(attempt),
        );

        let res = match AssertUnwindSafe(job.perform(args)).catch_unwind().await {
            Ok(res) => res,
            Err(panic) => Err(JobError::fatal(format!(
                "panicked: {}",
                panic_message(panic.as_ref())
            ))),
        };

        match res {
            Ok(()) => {
                exec.mark_succeeded();
                self.bus.publish(
                    Event::new(EventKind::JobSucceeded)
                        .with_job(job.name())
                        .with_attempt(attempt),
                );
                Ok(())
            }
            Err(err) => {
                self.bus.publish(
                    Event::new(EventKind::AttemptFailed)
                        .with_job(job.name())
                        .with_attempt(attempt)
                        .with_reason(err.to_string()),
                );
                Err(err)
            }
        }
    }

    /// Marks the execution failed and reports the terminal outcome.
    fn fail_terminally(&self, exec: &mut Execution, last: JobError) -> JobError {
        let attempts = exec.attempt();
        let name = exec.job().name().to_string();
        exec.mark_failed();

        let error = JobError::Exhausted {
            attempts,
            error: last.to_string(),
        };
        self.publish_failed(&name, attempts, &error);
        error
    }

    fn publish_failed(&self, job: &str, attempts: u32, error: &JobError) {
        self.bus.publish(
            Event::new(EventKind::JobFailed)
                .with_job(job)
                .with_attempt(attempts)
                .with_reason(error.to_string()),
        );
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "opaque panic payload".to_string()
    }
}
