//! # Logging subscriber.
//!
//! [`LogWriter`] renders lifecycle events through `tracing`, one line per
//! event. Enabled via the `logging` feature.

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Structured-logging subscriber backed by `tracing`.
///
/// Attach it through the scheduler builder to get a readable trace of every
/// enqueue, attempt, retry, and terminal outcome. Hosts that need metrics or
/// alerting implement their own [`Subscribe`] instead.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let job = e.job.as_deref().unwrap_or("?");
        match e.kind {
            EventKind::JobEnqueued => {
                info!(job, seq = e.seq, "enqueued");
            }
            EventKind::JobScheduled => {
                info!(job, seq = e.seq, due = ?e.due, "scheduled");
            }
            EventKind::AttemptStarted => {
                info!(job, attempt = e.attempt, "attempt starting");
            }
            EventKind::AttemptFailed => {
                warn!(job, attempt = e.attempt, reason = ?e.reason, "attempt failed");
            }
            EventKind::RetryScheduled => {
                info!(
                    job,
                    next_attempt = e.attempt,
                    delay_ms = e.delay_ms,
                    reason = ?e.reason,
                    "retry scheduled"
                );
            }
            EventKind::JobSucceeded => {
                info!(job, attempt = e.attempt, "succeeded");
            }
            EventKind::JobFailed => {
                error!(job, attempts = e.attempt, reason = ?e.reason, "failed permanently");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
