//! Object store backend implementations
//!
//! This module provides concrete implementations of the [`ObjectStore`],
//! [`Connect`] and [`Fetch`] traits. Production clients for a hosted object
//! store live outside this crate; the in-memory store here reproduces their
//! observable behavior for embedding and testing.
//!
//! [`ObjectStore`]: crate::traits::ObjectStore
//! [`Connect`]: crate::traits::Connect
//! [`Fetch`]: crate::traits::Fetch

pub mod memory;

// Re-export main types for convenience
pub use memory::{FetchFault, MemoryObjectStore, Operation};
