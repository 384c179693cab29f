//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait for observing job outcomes
//! and [`SubscriberSet`], the ordered fan-out used by the scheduler's
//! listener task.
//!
//! ## Architecture
//! ```text
//! Coordinator ── publish(Event) ──► Bus ──► listener (in builder)
//!                                              │
//!                                              └──► SubscriberSet::emit(&Event)
//!                                                     ├──► LogWriter
//!                                                     ├──► Metrics
//!                                                     └──► Custom...
//! ```

mod subscriber;

#[cfg(feature = "logging")]
mod log;

pub use subscriber::{Subscribe, SubscriberSet};

#[cfg(feature = "logging")]
pub use log::LogWriter;
