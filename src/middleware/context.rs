//! # Trigger context flowing through the middleware chain.

use std::collections::HashMap;
use std::sync::Arc;

use crate::jobs::JobArgs;

/// What a trigger entry point knows about the scheduling call it wraps.
///
/// The context is passed by value through the chain; each interceptor may
/// enrich the metadata map before handing it to the next one.
#[derive(Clone, Debug)]
pub struct TriggerContext {
    /// Name of the job being triggered.
    pub job: Arc<str>,
    /// Arguments captured for the scheduling call.
    pub args: JobArgs,
    meta: HashMap<String, String>,
}

impl TriggerContext {
    /// Creates a context for the given job and arguments.
    pub fn new(job: impl Into<Arc<str>>, args: JobArgs) -> Self {
        Self {
            job: job.into(),
            args,
            meta: HashMap::new(),
        }
    }

    /// Sets a metadata entry (host-defined: auth principal, request id, ...).
    pub fn set_meta(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.meta.insert(key.into(), value.into());
    }

    /// Reads a metadata entry.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }
}
