//! # jobvisor
//!
//! **Jobvisor** is a lightweight job-scheduling core for Rust.
//!
//! It provides primitives to define, register, and defer named units of work
//! with configurable retry and backoff policies, over any queue or executor
//! that implements the [`Backend`] contract. The crate is designed as a
//! building block: queue drivers and host frameworks plug in at the edges.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   JobSpec    │   │   JobSpec    │   │   JobSpec    │
//!     │ (user job 1) │   │ (user job 2) │   │ (user job 3) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Registry (populated once at bootstrap, insertion-ordered)        │
//! └───────────────────────────────┬───────────────────────────────────┘
//!                                 ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Scheduler                                                        │
//! │  - perform_later / perform_at / perform_in / perform_now          │
//! │  - Bus (broadcast events)                                         │
//! │  - MiddlewareChain (exposed for host trigger points)              │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        ▼
//! ┌──────────────┐     dispatch      ┌──────────────────────────────┐
//! │   Backend    │ ────────────────► │  Coordinator (retry engine)  │
//! │ (queue/exec) │ ◄──────────────── │  consults RetryPolicy        │
//! └──────────────┘    enqueue_at     └──────────────┬───────────────┘
//!                    (next attempt)                 │ publishes
//!                                                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │              Bus (broadcast) ──► listener ──► SubscriberSet       │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! JobSpec ──► Scheduler::perform_later ──► Backend queue ──► Coordinator::dispatch
//!
//! dispatch (one attempt per call):
//!   ├─► publish AttemptStarted{ job, attempt }
//!   ├─► perform(args)
//!   │     ├─ Ok  ──► publish JobSucceeded ──► done
//!   │     └─ Err ──► publish AttemptFailed
//!   │           ├─ retryable && attempt < max_attempts:
//!   │           │     ├─► delay = policy.delay_for(attempt + 1)
//!   │           │     ├─► publish RetryScheduled{ delay, attempt + 1 }
//!   │           │     └─► Backend::enqueue_at(now + delay)
//!   │           └─ otherwise ──► publish JobFailed{ attempts, last error }
//!   └─► exit; the requeued attempt arrives like any other execution
//!
//! perform_now runs the same machine inline, sleeping the computed delays
//! and suspending the caller until the terminal outcome.
//! ```
//!
//! ## Features
//! | Area           | Description                                              | Key types / traits                  |
//! |----------------|----------------------------------------------------------|-------------------------------------|
//! | **Jobs**       | Define jobs as trait impls or closures.                  | [`Job`], [`JobFn`], [`JobSpec`]     |
//! | **Policies**   | Configure retry budgets and backoff curves.              | [`RetryPolicy`], [`Backoff`]        |
//! | **Registry**   | Explicit process-wide job collection.                    | [`Registry`]                        |
//! | **Scheduling** | Enqueue now, at a time, after a delay, or run inline.    | [`Scheduler`], [`Backend`]          |
//! | **Middleware** | Interceptors around host trigger points.                 | [`Middleware`], [`MiddlewareChain`] |
//! | **Events**     | Observe every attempt and terminal outcome.              | [`Event`], [`Bus`], [`Subscribe`]   |
//! | **Errors**     | Typed errors for scheduling and execution.               | [`ScheduleError`], [`JobError`]     |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] subscriber backed by
//!   `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use jobvisor::{
//!     Backoff, Config, JobArgs, JobError, JobFn, JobSpec, Registry, RetryPolicy, Scheduler,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Bootstrap: register every job once, explicitly.
//!     let registry = Arc::new(Registry::new());
//!     let report = JobSpec::new(JobFn::arc("daily-report", |args: JobArgs| async move {
//!         let day: String = args.arg(0)?;
//!         // build the report for `day`...
//!         # let _ = day;
//!         Ok::<_, JobError>(())
//!     }))
//!     .with_retry(RetryPolicy::new(
//!         3,
//!         Backoff::exponential_capped(Duration::from_millis(10), Duration::from_millis(80)),
//!     ));
//!     registry.register(report.clone())?;
//!
//!     // Bind to a backend (defaults to the in-process worker).
//!     let scheduler = Scheduler::builder(Config::default())
//!         .with_registry(registry)
//!         .build()
//!         .await;
//!
//!     // Inline execution: suspends through retries.
//!     let args = JobArgs::new(vec![serde_json::json!("2024-06-01")]);
//!     scheduler.perform_now(&report, args).await?;
//!     Ok(())
//! }
//! ```

mod backends;
mod config;
mod core;
mod error;
mod events;
mod jobs;
mod middleware;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use backends::LocalBackend;
pub use config::Config;
pub use core::{
    Backend, Coordinator, DispatchOutcome, ExecState, Execution, Scheduler, SchedulerBuilder,
};
pub use error::{JobError, ScheduleError};
pub use events::{Bus, Event, EventKind};
pub use jobs::{Job, JobArgs, JobFn, JobRef, JobSpec, Registry};
pub use middleware::{Middleware, MiddlewareChain, Next, Passthrough, TriggerContext};
pub use policies::{Backoff, JitterPolicy, RetryPolicy};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logging subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
