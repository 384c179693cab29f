//! # Retry policies.
//!
//! This module provides the policy types consulted between attempts:
//! - [`Backoff`] - pure delay calculator (fixed or exponential)
//! - [`JitterPolicy`] - optional randomization of computed delays
//! - [`RetryPolicy`] - attempt budget bundled with backoff and jitter

mod backoff;
mod jitter;
mod retry;

pub use backoff::Backoff;
pub use jitter::JitterPolicy;
pub use retry::RetryPolicy;
