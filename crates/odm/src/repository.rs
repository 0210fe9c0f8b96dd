//! Repository - CRUD operations for one model type
//!
//! The repository owns timestamp bookkeeping: `create` stamps both
//! `created_at` and `updated_at`, `update` stamps `updated_at`. Reads go
//! through a fresh [`Query`] per call.

use std::fmt;
use std::marker::PhantomData;

use bson::oid::ObjectId;
use bson::{doc, Bson, Document};

use crate::database::{Collection, Database};
use crate::error::{ModelError, ModelResult};
use crate::model::{now_millis, Model, ID_FIELD};
use crate::query::Query;

/// CRUD entry point bound to one model and one database handle
pub struct Repository<M> {
    db: Database,
    _phantom: PhantomData<M>,
}

impl<M> Clone for Repository<M> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<M> fmt::Debug for Repository<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("database", &self.db.name())
            .field("model", &std::any::type_name::<M>())
            .finish()
    }
}

impl<M: Model> Repository<M> {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            _phantom: PhantomData,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn collection(&self) -> Collection {
        self.db.collection::<M>()
    }

    /// Fresh query builder; never shares state with another builder
    pub fn query(&self) -> Query<M> {
        Query::new(&self.db)
    }

    /// Stamp timestamps, insert, and assign the generated identity when the
    /// entity had none. Returns the identity.
    pub async fn create(&self, model: &mut M) -> ModelResult<ObjectId> {
        let now = now_millis();
        model.set_created_at(now);
        model.set_updated_at(now);

        let document = bson::to_document(&*model)?;
        let inserted = self.collection().insert_one(document).await?;

        let id = match (model.id(), inserted) {
            (Some(id), _) => id,
            (None, Bson::ObjectId(id)) => {
                model.set_id(id);
                id
            }
            (None, other) => {
                return Err(ModelError::Decode(serde::de::Error::custom(format!(
                    "expected an ObjectId identity, got {}",
                    other
                ))))
            }
        };

        tracing::debug!("Created document {} in '{}'", id, M::collection_name());
        Ok(id)
    }

    /// Partial update by identity; `updated_at` is added to `fields`.
    ///
    /// Fails with `NotFound` when nothing matched. A match that changes
    /// nothing still succeeds.
    pub async fn update(&self, id: ObjectId, mut fields: Document) -> ModelResult<()> {
        fields.insert("updated_at", bson::DateTime::from_chrono(now_millis()));
        self.apply_update(id, doc! { "$set": fields }).await
    }

    /// Hard delete by identity. Deleting a missing identity is not an error.
    pub async fn delete(&self, id: ObjectId) -> ModelResult<()> {
        let deleted = self
            .collection()
            .delete_one(Self::identity_filter(id))
            .await?;

        tracing::debug!(
            "Deleted {} document(s) with id {} from '{}'",
            deleted,
            id,
            M::collection_name()
        );
        Ok(())
    }

    /// Fetch by identity
    pub async fn find(&self, id: ObjectId) -> ModelResult<M> {
        self.query().where_eq(ID_FIELD, id).first().await
    }

    /// Set the soft-delete marker. The document stays in the collection and in
    /// query results unless the query calls `exclude_soft_deleted()`.
    pub async fn soft_delete(&self, id: ObjectId) -> ModelResult<()> {
        self.update(
            id,
            doc! { "deleted_at": bson::DateTime::from_chrono(now_millis()) },
        )
        .await
    }

    /// Clear the soft-delete marker
    pub async fn restore(&self, id: ObjectId) -> ModelResult<()> {
        self.apply_update(
            id,
            doc! {
                "$set": { "updated_at": bson::DateTime::from_chrono(now_millis()) },
                "$unset": { "deleted_at": "" },
            },
        )
        .await
    }

    fn identity_filter(id: ObjectId) -> Document {
        let mut filter = Document::new();
        filter.insert(ID_FIELD, id);
        filter
    }

    async fn apply_update(&self, id: ObjectId, update: Document) -> ModelResult<()> {
        let matched = self
            .collection()
            .update_one(Self::identity_filter(id), update)
            .await?;

        if matched == 0 {
            return Err(ModelError::NotFound(M::collection_name().to_string()));
        }

        tracing::debug!("Updated document {} in '{}'", id, M::collection_name());
        Ok(())
    }
}
