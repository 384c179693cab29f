//! # Scheduler builder.
//!
//! Wires the runtime pieces together in a fixed order: event bus →
//! coordinator → backend bind → job announcement (registration order) →
//! subscriber listener. Build inside a tokio runtime; the default backend
//! and the listener spawn tasks.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;

use crate::backends::LocalBackend;
use crate::config::Config;
use crate::events::Bus;
use crate::jobs::Registry;
use crate::core::backend::Backend;
use crate::core::coordinator::Coordinator;
use crate::core::scheduler::Scheduler;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Builder for constructing a [`Scheduler`].
///
/// ## Defaults
/// - registry: a fresh empty [`Registry`]
/// - backend: a [`LocalBackend`] (in-process FIFO worker)
/// - subscribers: none
pub struct SchedulerBuilder {
    cfg: Config,
    registry: Option<Arc<Registry>>,
    backend: Option<Arc<dyn Backend>>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SchedulerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            registry: None,
            backend: None,
            subscribers: Vec::new(),
        }
    }

    /// Uses an already-populated registry.
    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Uses the given backend instead of the in-process default.
    pub fn with_backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attaches event subscribers; delivery order is the given order.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the scheduler and binds the backend.
    ///
    /// Announces every registered spec to the backend in registration order,
    /// then spawns the subscriber listener (when subscribers were attached).
    pub async fn build(self) -> Scheduler {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let coordinator = Arc::new(Coordinator::new(bus.clone()));

        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(Registry::new()));
        let backend: Arc<dyn Backend> = match self.backend {
            Some(backend) => backend,
            None => LocalBackend::new(),
        };

        backend.bind(coordinator.clone());
        for spec in registry.all() {
            backend.add_job(&spec).await;
        }

        if !self.subscribers.is_empty() {
            let set = SubscriberSet::new(self.subscribers);
            let mut rx = bus.subscribe();
            tokio::spawn(async move {
                loop {
                    match rx.recv().await {
                        Ok(ev) => set.emit(&ev).await,
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(_)) => continue,
                    }
                }
            });
        }

        Scheduler::from_parts(self.cfg, registry, backend, coordinator, bus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{JobError, ScheduleError};
    use crate::events::Event;
    use crate::jobs::{JobArgs, JobFn, JobSpec};
    use crate::core::execution::Execution;
    use crate::subscribers::Subscribe;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingBackend {
        announced: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Backend for RecordingBackend {
        async fn add_job(&self, spec: &JobSpec) {
            self.announced.lock().unwrap().push(spec.name().to_string());
        }

        async fn enqueue(&self, _exec: Execution) -> Result<(), ScheduleError> {
            Ok(())
        }

        async fn enqueue_at(
            &self,
            _due: DateTime<Utc>,
            _exec: Execution,
        ) -> Result<(), ScheduleError> {
            Ok(())
        }
    }

    fn spec(name: &'static str) -> JobSpec {
        JobSpec::new(JobFn::arc(name, |_args: JobArgs| async {
            Ok::<_, JobError>(())
        }))
    }

    #[tokio::test]
    async fn test_jobs_announced_in_registration_order() {
        let registry = Arc::new(Registry::new());
        for name in ["third", "first", "second"] {
            registry.register(spec(name)).unwrap();
        }

        let backend = Arc::new(RecordingBackend::default());
        let _scheduler = Scheduler::builder(Config::default())
            .with_registry(registry)
            .with_backend(backend.clone())
            .build()
            .await;

        assert_eq!(
            *backend.announced.lock().unwrap(),
            vec!["third", "first", "second"]
        );
    }

    #[tokio::test]
    async fn test_subscribers_observe_published_events() {
        struct Counting(Arc<AtomicUsize>);

        #[async_trait]
        impl Subscribe for Counting {
            async fn on_event(&self, _event: &Event) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let seen = Arc::new(AtomicUsize::new(0));
        let scheduler = Scheduler::builder(Config::default())
            .with_backend(Arc::new(RecordingBackend::default()))
            .with_subscribers(vec![Arc::new(Counting(seen.clone()))])
            .build()
            .await;

        scheduler
            .perform_later(&spec("observed"), JobArgs::empty())
            .await
            .unwrap();

        // The listener runs on its own task; give it a moment.
        tokio::time::timeout(Duration::from_secs(2), async {
            while seen.load(Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("subscriber should observe the enqueue event");
    }
}
