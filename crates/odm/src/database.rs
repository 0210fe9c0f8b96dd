//! Database Connection Handle
//!
//! [`Database`] owns the shared backend and hands out [`Collection`] handles by
//! model. It is cheap to clone and safe to use from many tasks at once; the
//! backend's own pooling is the only shared state.

use std::fmt;
use std::sync::Arc;

use bson::{Bson, Document};

use crate::backends::{DocumentBackend, MemoryBackend, MongoBackend};
use crate::config::OdmConfig;
use crate::error::ModelResult;
use crate::model::Model;

/// Shared session against one logical database
#[derive(Clone)]
pub struct Database {
    backend: Arc<dyn DocumentBackend>,
}

impl Database {
    /// Connect to MongoDB with default settings
    pub async fn connect(uri: &str, database: &str) -> ModelResult<Self> {
        Self::connect_with_config(OdmConfig::new(uri, database)).await
    }

    pub async fn connect_with_config(config: OdmConfig) -> ModelResult<Self> {
        let backend = MongoBackend::connect(&config).await?;
        Ok(Self::with_backend(Arc::new(backend)))
    }

    /// Process-local database, mainly for tests and embedding
    pub fn in_memory(database: &str) -> Self {
        Self::with_backend(Arc::new(MemoryBackend::new(database)))
    }

    pub fn with_backend(backend: Arc<dyn DocumentBackend>) -> Self {
        Self { backend }
    }

    pub fn name(&self) -> &str {
        self.backend.database_name()
    }

    pub fn backend(&self) -> &Arc<dyn DocumentBackend> {
        &self.backend
    }

    /// Collection handle for a model's declared collection
    pub fn collection<M: Model>(&self) -> Collection {
        self.collection_named(M::collection_name())
    }

    /// Collection handle by name; the collection itself is created on first write
    pub fn collection_named(&self, name: &str) -> Collection {
        Collection {
            backend: Arc::clone(&self.backend),
            name: name.to_string(),
        }
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("name", &self.name())
            .field("backend", &self.backend)
            .finish()
    }
}

/// Handle to one named collection
#[derive(Clone)]
pub struct Collection {
    backend: Arc<dyn DocumentBackend>,
    name: String,
}

impl Collection {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn insert_one(&self, document: Document) -> ModelResult<Bson> {
        self.backend.insert_one(&self.name, document).await
    }

    pub async fn update_one(&self, filter: Document, update: Document) -> ModelResult<u64> {
        self.backend.update_one(&self.name, filter, update).await
    }

    pub async fn delete_one(&self, filter: Document) -> ModelResult<u64> {
        self.backend.delete_one(&self.name, filter).await
    }

    pub async fn find_one(&self, filter: Document) -> ModelResult<Option<Document>> {
        self.backend.find_one(&self.name, filter).await
    }

    pub async fn aggregate(&self, pipeline: Vec<Document>) -> ModelResult<Vec<Document>> {
        self.backend.aggregate(&self.name, pipeline).await
    }

    pub async fn count(&self, filter: Document) -> ModelResult<u64> {
        self.backend.count(&self.name, filter).await
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("database", &self.backend.database_name())
            .field("name", &self.name)
            .finish()
    }
}
