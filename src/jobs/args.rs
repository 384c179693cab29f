//! # Ordered argument snapshot for job invocations.
//!
//! [`JobArgs`] captures the arguments of a scheduling call as an immutable
//! sequence of JSON values. The snapshot is taken once at scheduling time and
//! shared (cheaply cloned) across every retry of the same execution.
//!
//! Arity or type mismatches are a caller contract violation detected at
//! execution time: [`JobArgs::arg`] surfaces them as
//! [`JobError::Invocation`], not at schedule time.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::JobError;

/// Immutable, cheaply clonable sequence of invocation arguments.
///
/// # Example
/// ```rust
/// use jobvisor::JobArgs;
/// use serde_json::json;
///
/// let args = JobArgs::new(vec![json!("alice"), json!(3)]);
/// let name: String = args.arg(0).unwrap();
/// let count: u32 = args.arg(1).unwrap();
/// assert_eq!((name.as_str(), count), ("alice", 3));
///
/// // Missing arguments surface as invocation errors at execution time.
/// assert!(args.arg::<String>(2).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct JobArgs(Arc<[Value]>);

impl Default for JobArgs {
    fn default() -> Self {
        Self(Vec::new().into())
    }
}

impl JobArgs {
    /// Snapshots the given values.
    pub fn new(values: Vec<Value>) -> Self {
        Self(values.into())
    }

    /// An empty argument list.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of captured arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no arguments were captured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw value at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Iterates over the raw values in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    /// Deserializes the argument at `index` into `T`.
    ///
    /// A missing argument or a type mismatch yields
    /// [`JobError::Invocation`].
    pub fn arg<T: DeserializeOwned>(&self, index: usize) -> Result<T, JobError> {
        let value = self
            .0
            .get(index)
            .ok_or_else(|| JobError::invocation(format!("missing argument {index}")))?;
        serde_json::from_value(value.clone())
            .map_err(|e| JobError::invocation(format!("argument {index}: {e}")))
    }
}

impl From<Vec<Value>> for JobArgs {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

impl FromIterator<Value> for JobArgs {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
