//! # Backend contract.
//!
//! [`Backend`] is the interface any queue/executor plugs in through: an
//! in-process worker, a distributed queue driver, a cron-like scheduler. The
//! core never assumes a specific technology behind it.
//!
//! ## Contract
//! - `enqueue` runs the execution as soon as a worker is free; ordering
//!   relative to other pending executions is FIFO best-effort.
//! - `enqueue_at` must not run the execution before its due time.
//! - When the execution is picked up, the backend calls
//!   [`Coordinator::dispatch`](crate::Coordinator::dispatch) with itself as
//!   the requeue target; failed attempts with remaining budget come back
//!   through `enqueue_at`.
//! - `bind` hands the backend its coordinator once, before any dispatch.
//! - `add_job` is invoked once per registered spec, in registration order,
//!   when a scheduler is built around the backend.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use crate::error::ScheduleError;
use crate::jobs::JobSpec;
use crate::middleware::MiddlewareChain;
use crate::core::coordinator::Coordinator;
use crate::core::execution::Execution;

/// Pluggable queue/executor behind a [`Scheduler`](crate::Scheduler).
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// Announces a registered job spec to the backend.
    ///
    /// Called once per spec, in registration order, at scheduler build time.
    /// Backends that need no per-job setup keep the default no-op.
    async fn add_job(&self, _spec: &JobSpec) {}

    /// Hands the backend its dispatch entry point.
    ///
    /// Called exactly once, before any `add_job` or enqueue.
    fn bind(&self, _coordinator: Arc<Coordinator>) {}

    /// Queues an execution for pickup as soon as a worker is free.
    async fn enqueue(&self, exec: Execution) -> Result<(), ScheduleError>;

    /// Queues an execution that must not run before `due`.
    async fn enqueue_at(&self, due: DateTime<Utc>, exec: Execution) -> Result<(), ScheduleError>;

    /// Accepted lateness for absolute run times.
    ///
    /// `perform_at` rejects targets further in the past than this.
    fn tolerance(&self) -> TimeDelta {
        TimeDelta::zero()
    }

    /// Middleware chain this backend wants around trigger entry points.
    ///
    /// `None` gets the passthrough default.
    fn middlewares(&self) -> Option<MiddlewareChain> {
        None
    }
}
