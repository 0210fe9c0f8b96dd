//! MongoDB Backend Implementation
//!
//! Thin adapter from [`DocumentBackend`] to the official `mongodb` driver. The
//! driver owns pooling, wire protocol and server selection; errors it reports
//! are passed through untouched.

use async_trait::async_trait;
use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use ::mongodb::options::ClientOptions;
use ::mongodb::{Client, Collection, Database};

use super::core::DocumentBackend;
use crate::config::{redact_uri, OdmConfig};
use crate::error::{ModelError, ModelResult};

/// MongoDB-backed document store bound to one logical database
#[derive(Debug, Clone)]
pub struct MongoBackend {
    client: Client,
    database: Database,
}

impl MongoBackend {
    /// Build a client from the configuration and bind the named database.
    ///
    /// A malformed address fails while parsing; with `verify_connection`
    /// enabled an unreachable server fails on the initial `ping`.
    pub async fn connect(config: &OdmConfig) -> ModelResult<Self> {
        config.validate()?;

        tracing::debug!(
            "Connecting to MongoDB at {} (database '{}')",
            redact_uri(&config.uri),
            config.database
        );

        let mut options = ClientOptions::parse(&config.uri).await.map_err(|e| {
            ModelError::Connection(format!("Invalid MongoDB connection string: {}", e))
        })?;
        options.app_name = config.app_name.clone();
        options.max_pool_size = config.max_pool_size;
        options.min_pool_size = config.min_pool_size;
        options.connect_timeout = config.connect_timeout;
        options.server_selection_timeout = config.server_selection_timeout;

        let client = Client::with_options(options).map_err(|e| {
            ModelError::Connection(format!("Failed to create MongoDB client: {}", e))
        })?;
        let database = client.database(&config.database);

        if config.verify_connection {
            database
                .run_command(doc! { "ping": 1 }, None)
                .await
                .map_err(|e| ModelError::Connection(format!("MongoDB is unreachable: {}", e)))?;
        }

        tracing::info!("Connected to MongoDB database '{}'", config.database);
        Ok(Self { client, database })
    }

    /// Wrap an already configured driver database
    pub fn from_database(client: Client, database: Database) -> Self {
        Self { client, database }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

#[async_trait]
impl DocumentBackend for MongoBackend {
    fn database_name(&self) -> &str {
        self.database.name()
    }

    async fn insert_one(&self, collection: &str, document: Document) -> ModelResult<Bson> {
        let result = self.collection(collection).insert_one(document, None).await?;
        Ok(result.inserted_id)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> ModelResult<u64> {
        let result = self
            .collection(collection)
            .update_one(filter, update, None)
            .await?;
        Ok(result.matched_count)
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> ModelResult<u64> {
        let result = self.collection(collection).delete_one(filter, None).await?;
        Ok(result.deleted_count)
    }

    async fn find_one(&self, collection: &str, filter: Document) -> ModelResult<Option<Document>> {
        Ok(self.collection(collection).find_one(filter, None).await?)
    }

    async fn aggregate(&self, collection: &str, pipeline: Vec<Document>) -> ModelResult<Vec<Document>> {
        let cursor = self.collection(collection).aggregate(pipeline, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count(&self, collection: &str, filter: Document) -> ModelResult<u64> {
        Ok(self
            .collection(collection)
            .count_documents(filter, None)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_malformed_uri_is_a_connection_error() {
        let config = OdmConfig::new("mongodb://", "app").with_verify_connection(false);
        let err = MongoBackend::connect(&config).await.unwrap_err();
        assert!(matches!(err, ModelError::Connection(_)));
    }

    #[tokio::test]
    async fn test_wrong_scheme_is_rejected_before_parsing() {
        let config = OdmConfig::new("http://localhost:27017", "app");
        let err = MongoBackend::connect(&config).await.unwrap_err();
        assert!(matches!(err, ModelError::Connection(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_fails_at_connect() {
        // Nothing listens on this port
        let config = OdmConfig::new("mongodb://127.0.0.1:1", "app")
            .with_server_selection_timeout(Duration::from_millis(300));
        let err = MongoBackend::connect(&config).await.unwrap_err();
        assert!(matches!(err, ModelError::Connection(_)));
    }

    #[tokio::test]
    async fn test_connect_without_verification_is_lazy() {
        // Nothing listens on this port; the driver only connects on first use.
        let config = OdmConfig::new("mongodb://127.0.0.1:1", "lazy_db").with_verify_connection(false);
        let backend = MongoBackend::connect(&config).await.unwrap();
        assert_eq!(backend.database_name(), "lazy_db");
    }
}
