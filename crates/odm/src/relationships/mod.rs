//! Relationships - Declarative one-level joins resolved inside the query pipeline
//!
//! A model lists its relations in a [`RelationRegistry`]; `Query::with(name)`
//! resolves the name there and appends the descriptor's `$lookup` stage.

pub mod metadata;
pub mod registry;

pub use metadata::{RelationKind, Relationship};
pub use registry::{RelationFactory, RelationRegistry};
