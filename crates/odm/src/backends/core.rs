//! Core Document Backend Trait
//!
//! The ODM talks to storage only through [`DocumentBackend`]. Every call is
//! scoped to one collection by name; collections that do not exist yet are
//! created lazily by the backend on first write.

use std::fmt::Debug;

use async_trait::async_trait;
use bson::{Bson, Document};

use crate::error::ModelResult;

/// Collection-scoped document operations provided by a database driver
#[async_trait]
pub trait DocumentBackend: Send + Sync + Debug {
    /// Logical database name this backend is bound to
    fn database_name(&self) -> &str;

    /// Insert one document and return its `_id` (generated when absent)
    async fn insert_one(&self, collection: &str, document: Document) -> ModelResult<Bson>;

    /// Apply an update document to the first match and return the matched count
    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> ModelResult<u64>;

    /// Remove the first match and return the deleted count
    async fn delete_one(&self, collection: &str, filter: Document) -> ModelResult<u64>;

    /// Fetch the first document matching the filter
    async fn find_one(&self, collection: &str, filter: Document) -> ModelResult<Option<Document>>;

    /// Run an aggregation pipeline and collect every resulting document
    async fn aggregate(&self, collection: &str, pipeline: Vec<Document>) -> ModelResult<Vec<Document>>;

    /// Count documents matching the filter
    async fn count(&self, collection: &str, filter: Document) -> ModelResult<u64>;
}
