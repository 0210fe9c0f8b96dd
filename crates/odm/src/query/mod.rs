//! Query Builder Module - Fluent, type-parameterized queries compiled to aggregation pipelines

pub mod builder;
pub mod execution;
pub mod ordering;
pub mod pagination;
pub mod pipeline;
pub mod types;
pub mod where_clause;
pub mod with;

pub use builder::Query;
pub use types::OrderDirection;
