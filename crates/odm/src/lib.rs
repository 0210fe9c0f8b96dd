//! # elif-odm: Document Layer for elif.rs
//!
//! Object-document mapping over MongoDB: a [`Model`] capability trait with
//! reusable [`BaseModel`] fields, a fluent [`Query`] builder compiled to an
//! aggregation pipeline with eager-loaded [`Relationship`]s, and a
//! [`Repository`] for create/update/delete with automatic timestamps.
//!
//! ```ignore
//! let db = Database::connect("mongodb://localhost:27017", "app").await?;
//! let users = Repository::<User>::new(&db);
//!
//! let mut alice = User::new("Alice", "alice@test.com");
//! users.create(&mut alice).await?;
//!
//! let recent = users
//!     .query()
//!     .where_eq("email", "alice@test.com")
//!     .with("Posts")?
//!     .sort("created_at", false)
//!     .limit(10)
//!     .get()
//!     .await?;
//! ```
//!
//! Every operation is a single future. Dropping it cancels the operation and
//! deadlines are the caller's (`tokio::time::timeout`); nothing here adds a
//! timeout or retries.

pub mod backends;
pub mod config;
pub mod database;
pub mod error;
pub mod model;
pub mod query;
pub mod relationships;
pub mod repository;

#[cfg(test)]
mod tests;

// Re-exported for `delegate_base_model!` and for callers building filters
pub use bson;
pub use chrono;

pub use backends::{DocumentBackend, MemoryBackend, MongoBackend};
pub use bson::oid::ObjectId;
pub use config::OdmConfig;
pub use database::{Collection, Database};
pub use error::*;
pub use model::{now_millis, BaseModel, Model, ID_FIELD};
pub use query::{OrderDirection, Query};
pub use relationships::{RelationKind, RelationRegistry, Relationship};
pub use repository::Repository;
