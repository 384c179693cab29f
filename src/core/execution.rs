//! # Per-scheduling runtime record.
//!
//! [`Execution`] is what actually travels through a backend queue: the job
//! spec, the argument snapshot, the attempt counter, the time it becomes
//! eligible to run, and its state.
//!
//! ## Rules
//! - `attempt` is 1-based and never exceeds the spec's budget while the
//!   execution is live (`Pending`/`Running`).
//! - `Succeeded` and `Failed` are terminal.
//! - Exactly one worker owns an execution at a time; the record moves by
//!   value through the backend, so there is no shared mutation.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::jobs::{JobArgs, JobSpec};

/// Converts a wall-clock-bound std duration into a chrono delta, clamping
/// instead of failing on absurd inputs.
pub(crate) fn to_delta(d: Duration) -> TimeDelta {
    TimeDelta::milliseconds(d.as_millis().min(i64::MAX as u128) as i64)
}

/// State of one scheduled execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecState {
    /// Waiting in a backend queue (or for its due time).
    Pending,
    /// An attempt is currently running.
    Running,
    /// Finished successfully. Terminal.
    Succeeded,
    /// Failed permanently. Terminal.
    Failed,
}

/// One scheduled run of a job, owned by the backend that queued it.
#[derive(Clone)]
pub struct Execution {
    spec: JobSpec,
    args: JobArgs,
    attempt: u32,
    due_at: DateTime<Utc>,
    state: ExecState,
}

impl Execution {
    /// Creates a fresh execution, eligible at `due_at`, first attempt.
    pub(crate) fn new(spec: JobSpec, args: JobArgs, due_at: DateTime<Utc>) -> Self {
        Self {
            spec,
            args,
            attempt: 1,
            due_at,
            state: ExecState::Pending,
        }
    }

    /// The job spec this execution runs.
    pub fn job(&self) -> &JobSpec {
        &self.spec
    }

    /// Arguments captured at scheduling time.
    pub fn args(&self) -> &JobArgs {
        &self.args
    }

    /// Current (or upcoming) attempt number, 1-based.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// When this execution becomes eligible to run.
    pub fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    /// Current state.
    pub fn state(&self) -> ExecState {
        self.state
    }

    /// True while another attempt is still permitted after a failure.
    pub fn has_budget(&self) -> bool {
        self.attempt < self.spec.max_attempts()
    }

    pub(crate) fn mark_running(&mut self) {
        debug_assert_eq!(self.state, ExecState::Pending);
        debug_assert!(self.attempt <= self.spec.max_attempts());
        self.state = ExecState::Running;
    }

    pub(crate) fn mark_succeeded(&mut self) {
        debug_assert_eq!(self.state, ExecState::Running);
        self.state = ExecState::Succeeded;
    }

    pub(crate) fn mark_failed(&mut self) {
        self.state = ExecState::Failed;
    }

    /// Moves to the next attempt, eligible at `due_at`.
    pub(crate) fn reschedule(&mut self, due_at: DateTime<Utc>) {
        self.attempt += 1;
        debug_assert!(self.attempt <= self.spec.max_attempts());
        self.due_at = due_at;
        self.state = ExecState::Pending;
    }
}
