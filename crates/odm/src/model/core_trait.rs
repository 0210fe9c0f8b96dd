//! Core Model Trait - Capability contract for persisted entities
//!
//! Every method without a default body is a capability the repository and
//! query builder depend on; a type that lacks one does not compile.

use std::fmt::Debug;

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::relationships::RelationRegistry;

/// Field every document stores its identity under
pub const ID_FIELD: &str = "_id";

/// Core trait for document models
pub trait Model: Serialize + DeserializeOwned + Debug + Send + Sync {
    /// Collection this model is stored in
    fn collection_name() -> &'static str;

    /// Identity of this instance, `None` until first created
    fn id(&self) -> Option<ObjectId>;

    fn set_id(&mut self, id: ObjectId);

    fn created_at(&self) -> Option<DateTime<Utc>>;

    fn set_created_at(&mut self, timestamp: DateTime<Utc>);

    fn updated_at(&self) -> Option<DateTime<Utc>>;

    fn set_updated_at(&mut self, timestamp: DateTime<Utc>);

    /// Soft-delete marker. Advisory: no default query excludes marked documents.
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    fn is_soft_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }

    /// Named relationships available to `Query::with`
    fn relations() -> RelationRegistry {
        RelationRegistry::new()
    }
}
