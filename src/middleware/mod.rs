//! # Middleware chain around trigger entry points.
//!
//! This module provides the interceptor types wrapped around external trigger
//! points (e.g. an inbound request that enqueues a job):
//! - [`Middleware`] - single-method `call(ctx, next)` capability
//! - [`MiddlewareChain`] - ordered stack with a passthrough default
//! - [`Next`] - continuation handed to each interceptor
//! - [`Passthrough`] - the default interceptor, always calls `next`
//! - [`TriggerContext`] - what flows through the chain

mod chain;
mod context;

pub use chain::{Middleware, MiddlewareChain, Next, Passthrough};
pub use context::TriggerContext;
