//! Document Backend Abstractions
//!
//! The query builder and repository never depend on a driver directly. They go
//! through the [`DocumentBackend`] trait, implemented here for MongoDB and for
//! an in-process store that evaluates the same pipelines.

pub mod core;
pub mod memory;
pub mod mongodb;

pub use self::core::DocumentBackend;
pub use self::memory::{MemoryBackend, MemoryBackendError};
pub use self::mongodb::MongoBackend;
