//! # Process-wide registry of job specifications.
//!
//! [`Registry`] is an explicit value with a controlled lifetime: construct it
//! once at process start, register every [`JobSpec`] during bootstrap, then
//! share it read-only with the scheduler. No module-level singleton, so tests
//! get isolated instances for free.
//!
//! ## Rules
//! - Names are unique; a duplicate registration is rejected with
//!   [`ScheduleError::DuplicateName`], never silently overwritten.
//! - [`Registry::all`] preserves insertion order, which fixes the order in
//!   which specs are announced to a backend at bind time.
//! - `register` takes the exclusive lock; lookups share a read lock.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::ScheduleError;
use crate::jobs::spec::JobSpec;

/// Process-wide collection of registered job specifications.
///
/// # Example
/// ```rust
/// use jobvisor::{JobArgs, JobError, JobFn, JobSpec, Registry};
///
/// let registry = Registry::new();
/// let spec = JobSpec::new(JobFn::arc("sync", |_args: JobArgs| async {
///     Ok::<_, JobError>(())
/// }));
///
/// registry.register(spec.clone()).unwrap();
/// assert!(registry.register(spec).is_err()); // duplicate name
/// assert_eq!(registry.all().len(), 1);
/// ```
#[derive(Default)]
pub struct Registry {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    order: Vec<JobSpec>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a spec, rejecting duplicate names.
    pub fn register(&self, spec: JobSpec) -> Result<(), ScheduleError> {
        let mut inner = self.inner.write().unwrap_or_else(|p| p.into_inner());
        let name = spec.name().to_string();
        if inner.index.contains_key(&name) {
            return Err(ScheduleError::DuplicateName { name });
        }
        let slot = inner.order.len();
        inner.order.push(spec);
        inner.index.insert(name, slot);
        Ok(())
    }

    /// Returns an insertion-ordered snapshot of every registered spec.
    pub fn all(&self) -> Vec<JobSpec> {
        let inner = self.inner.read().unwrap_or_else(|p| p.into_inner());
        inner.order.clone()
    }

    /// Looks up a spec by name.
    pub fn get(&self, name: &str) -> Option<JobSpec> {
        let inner = self.inner.read().unwrap_or_else(|p| p.into_inner());
        inner.index.get(name).map(|&slot| inner.order[slot].clone())
    }

    /// Number of registered specs.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .order
            .len()
    }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
