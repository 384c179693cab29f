//! # Ordered interceptor chain.
//!
//! [`MiddlewareChain`] runs interceptors strictly in declared order; each one
//! receives the [`TriggerContext`] and a [`Next`] continuation. An
//! interceptor that never invokes `next` is a deliberate halt, not an error:
//! the rest of the chain and the endpoint are skipped and the call returns
//! `Ok`.
//!
//! The default chain (when a backend declares none) is a single
//! [`Passthrough`] that always invokes `next` immediately.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use jobvisor::{Middleware, Next, ScheduleError, TriggerContext};
//!
//! struct Tag;
//!
//! #[async_trait]
//! impl Middleware for Tag {
//!     async fn call(&self, mut ctx: TriggerContext, next: Next) -> Result<(), ScheduleError> {
//!         ctx.set_meta("source", "api");
//!         next.run(ctx).await
//!     }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::ScheduleError;
use crate::middleware::context::TriggerContext;

type Endpoint = dyn Fn(TriggerContext) -> BoxFuture<'static, Result<(), ScheduleError>>
    + Send
    + Sync
    + 'static;

/// Single interceptor in the chain.
#[async_trait]
pub trait Middleware: Send + Sync + 'static {
    /// Handles the trigger; call `next.run(ctx)` to continue, or return
    /// without doing so to halt the chain.
    async fn call(&self, ctx: TriggerContext, next: Next) -> Result<(), ScheduleError>;

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Continuation handed to each interceptor.
///
/// Running it executes the remaining interceptors in order and finally the
/// endpoint. Dropping it without running halts the chain.
pub struct Next {
    stack: Arc<[Arc<dyn Middleware>]>,
    pos: usize,
    endpoint: Arc<Endpoint>,
}

impl Next {
    /// Invokes the rest of the chain with the given context.
    pub async fn run(self, ctx: TriggerContext) -> Result<(), ScheduleError> {
        match self.stack.get(self.pos).cloned() {
            Some(mw) => {
                let next = Next {
                    stack: self.stack,
                    pos: self.pos + 1,
                    endpoint: self.endpoint,
                };
                mw.call(ctx, next).await
            }
            None => (self.endpoint)(ctx).await,
        }
    }
}

/// Interceptor that always continues. The default chain is exactly one of
/// these.
pub struct Passthrough;

#[async_trait]
impl Middleware for Passthrough {
    async fn call(&self, ctx: TriggerContext, next: Next) -> Result<(), ScheduleError> {
        next.run(ctx).await
    }

    fn name(&self) -> &'static str {
        "passthrough"
    }
}

/// Ordered, immutable stack of interceptors.
#[derive(Clone)]
pub struct MiddlewareChain {
    stack: Arc<[Arc<dyn Middleware>]>,
}

impl MiddlewareChain {
    /// Creates a chain from the given interceptors; order is call order.
    pub fn new(stack: Vec<Arc<dyn Middleware>>) -> Self {
        Self {
            stack: stack.into(),
        }
    }

    /// The default chain: a single [`Passthrough`].
    pub fn passthrough() -> Self {
        Self::new(vec![Arc::new(Passthrough)])
    }

    /// Number of interceptors in the chain.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// True for a chain with no interceptors at all.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Runs the chain around `endpoint`.
    ///
    /// The endpoint executes only if every interceptor passed the context
    /// on; a halt returns `Ok` without reaching it.
    pub async fn run<F, Fut>(&self, ctx: TriggerContext, endpoint: F) -> Result<(), ScheduleError>
    where
        F: Fn(TriggerContext) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), ScheduleError>> + Send + 'static,
    {
        let endpoint: Arc<Endpoint> = Arc::new(move |ctx| {
            let fut: BoxFuture<'static, Result<(), ScheduleError>> = Box::pin(endpoint(ctx));
            fut
        });
        let next = Next {
            stack: self.stack.clone(),
            pos: 0,
            endpoint,
        };
        next.run(ctx).await
    }
}

impl Default for MiddlewareChain {
    fn default() -> Self {
        Self::passthrough()
    }
}
