//! # Subscriber trait and fan-out set.
//!
//! [`Subscribe`] is the extension point for observing lifecycle events:
//! logging, metrics, dead-letter handling. Terminal [`EventKind::JobFailed`]
//! events carry the total attempt count and the last error, so a dead-letter
//! subscriber sees everything the retry coordinator knew.
//!
//! Events are delivered sequentially, in subscriber order, from a single
//! listener task; a slow subscriber delays the ones after it, not the
//! publishers (the bus buffers in between).
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use jobvisor::{Event, EventKind, Subscribe};
//!
//! struct DeadLetter;
//!
//! #[async_trait]
//! impl Subscribe for DeadLetter {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::JobFailed) {
//!             // hand the job name + last error to an alerting pipeline
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "dead_letter" }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::events::Event;
#[cfg(doc)]
use crate::events::EventKind;

/// Contract for event subscribers.
///
/// Called from the scheduler's listener task. Implementations should avoid
/// blocking the async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Ordered fan-out over a fixed set of subscribers.
pub struct SubscriberSet {
    subs: Vec<Arc<dyn Subscribe>>,
}

impl SubscriberSet {
    /// Creates a set from the given subscribers; order is delivery order.
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        Self { subs }
    }

    /// True when no subscribers were attached.
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Delivers one event to every subscriber, sequentially.
    pub async fn emit(&self, event: &Event) {
        for sub in &self.subs {
            sub.on_event(event).await;
        }
    }
}
