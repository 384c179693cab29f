//! # In-process backend.
//!
//! [`LocalBackend`] runs executions on the current tokio runtime:
//!
//! ```text
//! enqueue ───────────────► [unbounded channel] ──► worker loop (serial)
//!                                ▲                     │
//! enqueue_at ──► timer task ─────┘                     └─► Coordinator::dispatch
//!                (sleep until due)                           │
//!                                                            └─ retry? ─► enqueue_at
//! ```
//!
//! ## Rules
//! - One worker drains the channel serially: FIFO best-effort ordering.
//! - Delayed executions wait on their own timer task, then join the same
//!   channel; due times degrade to FIFO on arrival.
//! - Shutdown (explicit [`LocalBackend::shutdown`] or dropping the last
//!   handle) cancels the worker and every pending timer. Queued work is
//!   lost — this backend keeps no state outside process memory, so a crash
//!   or shutdown forfeits pending retries.

use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::ScheduleError;
use crate::core::{Backend, Coordinator, Execution};

/// In-process FIFO backend for tests, demos and single-process deployments.
///
/// Create it inside a tokio runtime; [`Backend::bind`] spawns the worker.
pub struct LocalBackend {
    tx: mpsc::UnboundedSender<Execution>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<Execution>>>,
    token: CancellationToken,
    this: Weak<LocalBackend>,
}

impl LocalBackend {
    /// Creates an unbound backend; the worker starts at bind time.
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|this| {
            let (tx, rx) = mpsc::unbounded_channel();
            Self {
                tx,
                rx: Mutex::new(Some(rx)),
                token: CancellationToken::new(),
                this: this.clone(),
            }
        })
    }

    /// Stops the worker and cancels pending timers. Idempotent.
    pub fn shutdown(&self) {
        self.token.cancel();
    }
}

impl Drop for LocalBackend {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[async_trait]
impl Backend for LocalBackend {
    fn bind(&self, coordinator: Arc<Coordinator>) {
        let taken = self
            .rx
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take();
        // Second bind is a no-op; the first worker keeps the receiver.
        let Some(mut rx) = taken else { return };

        let this = self.this.clone();
        let token = self.token.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    msg = rx.recv() => {
                        let Some(exec) = msg else { break };
                        let Some(backend) = this.upgrade() else { break };
                        coordinator.dispatch(exec, backend.as_ref()).await;
                    }
                }
            }
        });
    }

    async fn enqueue(&self, exec: Execution) -> Result<(), ScheduleError> {
        self.tx
            .send(exec)
            .map_err(|_| ScheduleError::backend("queue closed"))
    }

    async fn enqueue_at(&self, due: DateTime<Utc>, exec: Execution) -> Result<(), ScheduleError> {
        if self.token.is_cancelled() {
            return Err(ScheduleError::backend("backend is shut down"));
        }

        let wait = (due - Utc::now())
            .to_std()
            .unwrap_or(std::time::Duration::ZERO);
        let tx = self.tx.clone();
        let token = self.token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(wait) => {
                    let _ = tx.send(exec);
                }
            }
        });
        Ok(())
    }

    fn tolerance(&self) -> TimeDelta {
        // Timer and clock slop for an in-process queue.
        TimeDelta::milliseconds(500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::JobError;
    use crate::events::EventKind;
    use crate::jobs::{JobArgs, JobFn, JobSpec};
    use crate::policies::{Backoff, RetryPolicy};
    use crate::core::Scheduler;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tokio::time::timeout;

    async fn wait_for(
        rx: &mut tokio::sync::broadcast::Receiver<crate::events::Event>,
        kind: EventKind,
    ) -> crate::events::Event {
        timeout(Duration::from_secs(5), async {
            loop {
                let ev = rx.recv().await.expect("bus open");
                if ev.kind == kind {
                    return ev;
                }
            }
        })
        .await
        .expect("event within deadline")
    }

    #[tokio::test]
    async fn test_flaky_job_retries_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_in_job = calls.clone();
        let job = JobFn::arc("flaky", move |_args: JobArgs| {
            let calls = calls_in_job.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(JobError::invocation(format!("boom #{n}")))
                } else {
                    Ok(())
                }
            }
        });
        let spec = JobSpec::new(job).with_retry(RetryPolicy::new(
            5,
            Backoff::fixed(Duration::from_millis(10)),
        ));

        let scheduler = Scheduler::builder(Config::default()).build().await;
        let mut rx = scheduler.subscribe();

        scheduler.perform_later(&spec, JobArgs::empty()).await.unwrap();

        let ev = wait_for(&mut rx, EventKind::JobSucceeded).await;
        assert_eq!(ev.attempt, Some(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausted_job_reports_terminal_failure() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_in_job = calls.clone();
        let job = JobFn::arc("doomed", move |_args: JobArgs| {
            let calls = calls_in_job.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Err::<(), _>(JobError::invocation(format!("boom #{n}")))
            }
        });
        let spec = JobSpec::new(job).with_retry(RetryPolicy::new(
            2,
            Backoff::fixed(Duration::from_millis(5)),
        ));

        let scheduler = Scheduler::builder(Config::default()).build().await;
        let mut rx = scheduler.subscribe();

        scheduler.perform_later(&spec, JobArgs::empty()).await.unwrap();

        let ev = wait_for(&mut rx, EventKind::JobFailed).await;
        assert_eq!(ev.attempt, Some(2), "total attempts");
        assert!(ev.reason.as_deref().unwrap_or("").contains("boom #2"));
        assert_eq!(calls.load(Ordering::SeqCst), 2, "never a 3rd attempt");
    }

    #[tokio::test]
    async fn test_perform_in_runs_after_delay() {
        let job = JobFn::arc("delayed", |_args: JobArgs| async {
            Ok::<_, JobError>(())
        });
        let spec = JobSpec::new(job);

        let scheduler = Scheduler::builder(Config::default()).build().await;
        let mut rx = scheduler.subscribe();

        scheduler
            .perform_in(Duration::from_millis(20), &spec, JobArgs::empty())
            .await
            .unwrap();

        let ev = wait_for(&mut rx, EventKind::JobSucceeded).await;
        assert_eq!(ev.job.as_deref(), Some("delayed"));
    }

    #[tokio::test]
    async fn test_args_reach_the_job() {
        let seen = Arc::new(std::sync::Mutex::new(None));
        let seen_in_job = seen.clone();
        let job = JobFn::arc("typed", move |args: JobArgs| {
            let seen = seen_in_job.clone();
            async move {
                let who: String = args.arg(0)?;
                *seen.lock().unwrap() = Some(who);
                Ok(())
            }
        });
        let spec = JobSpec::new(job);

        let scheduler = Scheduler::builder(Config::default()).build().await;
        let mut rx = scheduler.subscribe();

        let args = JobArgs::new(vec![serde_json::json!("alice")]);
        scheduler.perform_later(&spec, args).await.unwrap();

        wait_for(&mut rx, EventKind::JobSucceeded).await;
        assert_eq!(seen.lock().unwrap().as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_enqueue_after_shutdown_is_rejected() {
        let backend = LocalBackend::new();
        backend.shutdown();

        let job = JobFn::arc("too-late", |_args: JobArgs| async {
            Ok::<_, JobError>(())
        });
        let exec = Execution::new(JobSpec::new(job), JobArgs::empty(), Utc::now());
        let err = backend.enqueue_at(Utc::now(), exec).await.unwrap_err();
        assert_eq!(err.as_label(), "backend_rejected");
    }
}
