//! Query execution - terminal operations

use bson::Document;
use serde::de::DeserializeOwned;

use super::builder::Query;
use crate::error::{ModelError, ModelResult};
use crate::model::Model;

impl<M: Model> Query<M> {
    /// Run the compiled pipeline and decode every result as `M`.
    ///
    /// No match yields an empty vector. Each call re-executes against the
    /// current database state.
    pub async fn get(&self) -> ModelResult<Vec<M>> {
        self.get_as::<M>().await
    }

    /// First document matching the filter. Relations, sort and pagination are
    /// not applied.
    pub async fn first(&self) -> ModelResult<M> {
        tracing::debug!(
            "Fetching first document from '{}' with filter {}",
            self.collection.name(),
            self.filter
        );

        match self.collection.find_one(self.filter.clone()).await? {
            Some(document) => Ok(bson::from_document(document)?),
            None => Err(ModelError::NotFound(self.collection.name().to_string())),
        }
    }

    /// Like [`first`](Self::first) but `None` instead of `NotFound`
    pub async fn first_optional(&self) -> ModelResult<Option<M>> {
        match self.first().await {
            Ok(model) => Ok(Some(model)),
            Err(ModelError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl<M> Query<M> {
    /// Run the compiled pipeline and decode each result as `T`, e.g. a view
    /// type that carries the eager-loaded relation fields.
    pub async fn get_as<T: DeserializeOwned>(&self) -> ModelResult<Vec<T>> {
        self.get_documents()
            .await?
            .into_iter()
            .map(|document| bson::from_document(document).map_err(ModelError::from))
            .collect()
    }

    /// Run the compiled pipeline and return raw documents
    pub async fn get_documents(&self) -> ModelResult<Vec<Document>> {
        let pipeline = self.pipeline();
        tracing::debug!(
            "Running {}-stage pipeline on '{}'",
            pipeline.len(),
            self.collection.name()
        );
        tracing::trace!("Pipeline: {:?}", pipeline);

        self.collection.aggregate(pipeline).await
    }

    /// Number of documents matching the filter, ignoring pagination
    pub async fn count(&self) -> ModelResult<u64> {
        self.collection.count(self.filter.clone()).await
    }

    /// True when at least one document matches the filter
    pub async fn exists(&self) -> ModelResult<bool> {
        Ok(self.count().await? > 0)
    }
}
