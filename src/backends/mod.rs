//! # Bundled backends.
//!
//! One reference implementation ships with the crate: [`LocalBackend`], an
//! in-process FIFO worker. Distributed queue drivers live outside the crate
//! and implement [`Backend`](crate::Backend) the same way.

mod local;

pub use local::LocalBackend;
