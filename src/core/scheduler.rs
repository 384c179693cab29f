//! # Caller-facing scheduling surface.
//!
//! [`Scheduler`] binds a registry to a backend and exposes the four
//! scheduling operations:
//!
//! | Operation       | Behavior                                              |
//! |-----------------|-------------------------------------------------------|
//! | `perform_later` | enqueue for pickup as soon as a worker is free        |
//! | `perform_at`    | not eligible before the given wall-clock time         |
//! | `perform_in`    | `perform_at(now + delay)`                             |
//! | `perform_now`   | run in place, bypassing the queue, retries included   |
//!
//! Scheduling calls fail fast: an absolute time further in the past than the
//! backend tolerates is rejected synchronously with
//! [`ScheduleError::InvalidSchedule`] and never reaches the backend queue.
//! The hand-off calls never suspend beyond the backend accepting the
//! execution; only `perform_now` suspends through the job itself.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::config::Config;
use crate::error::{JobError, ScheduleError};
use crate::events::{Bus, Event, EventKind};
use crate::jobs::{JobArgs, JobSpec, Registry};
use crate::middleware::MiddlewareChain;
use crate::core::backend::Backend;
use crate::core::builder::SchedulerBuilder;
use crate::core::coordinator::Coordinator;
use crate::core::execution::{to_delta, Execution};

/// Scheduling contract bound to one backend.
///
/// Built via [`Scheduler::builder`]; cheap accessors expose the bus (for
/// observers) and the middleware chain (for host frameworks to install
/// around their trigger entry points).
pub struct Scheduler {
    cfg: Config,
    registry: Arc<Registry>,
    backend: Arc<dyn Backend>,
    coordinator: Arc<Coordinator>,
    bus: Bus,
    chain: MiddlewareChain,
}

impl Scheduler {
    /// Starts building a scheduler with the given configuration.
    pub fn builder(cfg: Config) -> SchedulerBuilder {
        SchedulerBuilder::new(cfg)
    }

    pub(crate) fn from_parts(
        cfg: Config,
        registry: Arc<Registry>,
        backend: Arc<dyn Backend>,
        coordinator: Arc<Coordinator>,
        bus: Bus,
    ) -> Self {
        let chain = backend.middlewares().unwrap_or_default();
        Self {
            cfg,
            registry,
            backend,
            coordinator,
            bus,
            chain,
        }
    }

    /// The configuration this scheduler was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// The registry this scheduler was built around.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The event bus; publish nothing, subscribe freely.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Shorthand for `bus().subscribe()`.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// The middleware chain to install around trigger entry points: the
    /// backend's declared chain, or the passthrough default.
    pub fn middleware_chain(&self) -> MiddlewareChain {
        self.chain.clone()
    }

    /// Enqueues `spec` for execution as soon as a worker is free.
    pub async fn perform_later(
        &self,
        spec: &JobSpec,
        args: JobArgs,
    ) -> Result<(), ScheduleError> {
        let exec = Execution::new(spec.clone(), args, Utc::now());
        self.backend.enqueue(exec).await?;
        self.bus
            .publish(Event::new(EventKind::JobEnqueued).with_job(spec.name()));
        Ok(())
    }

    /// Schedules `spec` to run no earlier than `due`.
    ///
    /// Fails with [`ScheduleError::InvalidSchedule`] when `due` is further in
    /// the past than the backend's tolerance.
    pub async fn perform_at(
        &self,
        due: DateTime<Utc>,
        spec: &JobSpec,
        args: JobArgs,
    ) -> Result<(), ScheduleError> {
        let now = Utc::now();
        let tolerance = self.backend.tolerance();
        if due < now - tolerance {
            return Err(ScheduleError::InvalidSchedule {
                due,
                now,
                tolerance,
            });
        }

        let exec = Execution::new(spec.clone(), args, due);
        self.backend.enqueue_at(due, exec).await?;
        self.bus.publish(
            Event::new(EventKind::JobScheduled)
                .with_job(spec.name())
                .with_due(due),
        );
        Ok(())
    }

    /// Schedules `spec` to run after `delay`.
    pub async fn perform_in(
        &self,
        delay: Duration,
        spec: &JobSpec,
        args: JobArgs,
    ) -> Result<(), ScheduleError> {
        let due = Utc::now()
            .checked_add_signed(to_delta(delay))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.perform_at(due, spec, args).await
    }

    /// Runs `spec` in place, bypassing the backend queue.
    ///
    /// Still subject to the retry policy: the caller is suspended through
    /// every attempt and every computed backoff delay.
    pub async fn perform_now(&self, spec: &JobSpec, args: JobArgs) -> Result<(), JobError> {
        let exec = Execution::new(spec.clone(), args, Utc::now());
        self.coordinator.run_inline(exec).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobFn;
    use crate::policies::{Backoff, RetryPolicy};
    use chrono::TimeDelta;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockBackend {
        enqueued: Mutex<Vec<Execution>>,
        scheduled: Mutex<Vec<(DateTime<Utc>, Execution)>>,
    }

    #[async_trait::async_trait]
    impl Backend for MockBackend {
        async fn enqueue(&self, exec: Execution) -> Result<(), ScheduleError> {
            self.enqueued.lock().unwrap().push(exec);
            Ok(())
        }

        async fn enqueue_at(
            &self,
            due: DateTime<Utc>,
            exec: Execution,
        ) -> Result<(), ScheduleError> {
            self.scheduled.lock().unwrap().push((due, exec));
            Ok(())
        }

        fn tolerance(&self) -> TimeDelta {
            TimeDelta::milliseconds(100)
        }
    }

    fn noop_spec(name: &'static str) -> JobSpec {
        JobSpec::new(JobFn::arc(name, |_args: JobArgs| async {
            Ok::<_, JobError>(())
        }))
    }

    async fn scheduler_with(backend: Arc<MockBackend>) -> Scheduler {
        Scheduler::builder(Config::default())
            .with_backend(backend)
            .build()
            .await
    }

    #[tokio::test]
    async fn test_perform_at_past_date_fails_fast() {
        let backend = Arc::new(MockBackend::default());
        let scheduler = scheduler_with(backend.clone()).await;

        let past = Utc::now() - TimeDelta::seconds(30);
        let err = scheduler
            .perform_at(past, &noop_spec("late"), JobArgs::empty())
            .await
            .unwrap_err();

        assert_eq!(err.as_label(), "invalid_schedule");
        assert!(
            backend.scheduled.lock().unwrap().is_empty(),
            "rejected schedule must never reach the backend"
        );
    }

    #[tokio::test]
    async fn test_perform_at_within_tolerance_is_accepted() {
        let backend = Arc::new(MockBackend::default());
        let scheduler = scheduler_with(backend.clone()).await;

        // 50ms in the past is inside the backend's 100ms tolerance.
        let slightly_late = Utc::now() - TimeDelta::milliseconds(50);
        scheduler
            .perform_at(slightly_late, &noop_spec("on-time"), JobArgs::empty())
            .await
            .unwrap();
        assert_eq!(backend.scheduled.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_perform_later_hands_off_first_attempt() {
        let backend = Arc::new(MockBackend::default());
        let scheduler = scheduler_with(backend.clone()).await;

        scheduler
            .perform_later(&noop_spec("mailer"), JobArgs::empty())
            .await
            .unwrap();

        let enqueued = backend.enqueued.lock().unwrap();
        assert_eq!(enqueued.len(), 1);
        assert_eq!(enqueued[0].attempt(), 1);
        assert_eq!(enqueued[0].job().name(), "mailer");
    }

    #[tokio::test]
    async fn test_perform_in_targets_future_due_time() {
        let backend = Arc::new(MockBackend::default());
        let scheduler = scheduler_with(backend.clone()).await;

        let before = Utc::now();
        scheduler
            .perform_in(Duration::from_secs(60), &noop_spec("digest"), JobArgs::empty())
            .await
            .unwrap();

        let scheduled = backend.scheduled.lock().unwrap();
        assert_eq!(scheduled.len(), 1);
        assert!(scheduled[0].0 >= before + TimeDelta::seconds(59));
    }

    #[tokio::test]
    async fn test_perform_now_bypasses_backend_but_retries() {
        let backend = Arc::new(MockBackend::default());
        let scheduler = scheduler_with(backend.clone()).await;

        let calls = Arc::new(AtomicU32::new(0));
        let calls_in_job = calls.clone();
        let job = JobFn::arc("inline", move |_args: JobArgs| {
            let calls = calls_in_job.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 2 {
                    Err(JobError::invocation("first try fails"))
                } else {
                    Ok(())
                }
            }
        });
        let spec = JobSpec::new(job).with_retry(RetryPolicy::new(
            3,
            Backoff::fixed(Duration::from_millis(1)),
        ));

        scheduler.perform_now(&spec, JobArgs::empty()).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(backend.enqueued.lock().unwrap().is_empty());
        assert!(backend.scheduled.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_default_chain_is_single_passthrough() {
        let backend = Arc::new(MockBackend::default());
        let scheduler = scheduler_with(backend).await;
        assert_eq!(scheduler.middleware_chain().len(), 1);
    }
}
