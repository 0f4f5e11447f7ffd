//! MongoDB adapter for the Espresso Emporium DocumentStore trait

use async_trait::async_trait;
use bson::{doc, Document as BsonDocument};
use espresso_core::prelude::*;
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, Credential};
use mongodb::{Client, Database};
use std::time::Duration;
use tracing::{debug, info};

mod config;
mod utils;

pub use config::MongoConfig;
pub use utils::{bson_to_json_document, escape_regex, filter_to_bson, json_to_bson_document, set_update};

/// MongoDB implementation of DocumentStore
pub struct MongoStore {
    database: Database,
    config: MongoConfig,
}

impl MongoStore {
    /// Connect and verify the deployment answers a ping
    pub async fn new(config: MongoConfig) -> Result<Self, StoreError> {
        info!("Connecting to MongoDB database {}", config.database);

        let mut options = ClientOptions::parse(config.uri.as_str())
            .await
            .map_err(|e| StoreError::ConnectionFailed(format!("Invalid MongoDB URI: {}", e)))?;

        options.app_name = Some(config.app_name.clone());
        options.connect_timeout = Some(Duration::from_millis(config.connection_timeout_ms));
        options.server_selection_timeout = Some(Duration::from_millis(config.connection_timeout_ms));
        if let Some(max_pool_size) = config.max_pool_size {
            options.max_pool_size = Some(max_pool_size);
        }

        if let (Some(user), Some(password)) = (&config.user, &config.password) {
            let mut credential = Credential::default();
            credential.username = Some(user.clone());
            credential.password = Some(password.clone());
            options.credential = Some(credential);
        }

        let client = Client::with_options(options)
            .map_err(|e| StoreError::ConnectionFailed(format!("MongoDB client setup failed: {}", e)))?;
        let database = client.database(&config.database);

        let store = Self { database, config };
        store.health_check().await?;

        info!("Connected to MongoDB database {}", store.config.database);
        Ok(store)
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<BsonDocument> {
        self.database.collection(collection.name())
    }
}

fn query_failed(operation: &str, e: mongodb::error::Error) -> StoreError {
    StoreError::QueryFailed(format!("{} failed: {}", operation, e))
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert_one(&self, collection: Collection, document: Document) -> Result<InsertOneResult, StoreError> {
        let id = DocumentId::new();
        let mut bson_document = json_to_bson_document(&document)?;
        bson_document.insert(ID_FIELD, id.object_id());

        debug!("Inserting {} into {}", id, collection);

        self.collection(collection)
            .insert_one(bson_document)
            .await
            .map_err(|e| query_failed("insert_one", e))?;

        Ok(InsertOneResult::new(id))
    }

    async fn find_one(&self, collection: Collection, filter: Filter) -> Result<Option<Document>, StoreError> {
        let query = filter_to_bson(&filter)?;
        debug!("find_one on {}: {}", collection, query);

        let found = self
            .collection(collection)
            .find_one(query)
            .await
            .map_err(|e| query_failed("find_one", e))?;

        Ok(found.map(bson_to_json_document))
    }

    async fn find(&self, collection: Collection, filter: Filter) -> Result<Vec<Document>, StoreError> {
        let query = filter_to_bson(&filter)?;
        debug!("find on {}: {}", collection, query);

        let cursor = self
            .collection(collection)
            .find(query)
            .await
            .map_err(|e| query_failed("find", e))?;
        let documents: Vec<BsonDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| query_failed("find cursor", e))?;

        Ok(documents.into_iter().map(bson_to_json_document).collect())
    }

    async fn update_one(&self, collection: Collection, id: DocumentId, set: Document) -> Result<UpdateResult, StoreError> {
        let selector = doc! { "_id": id.object_id() };
        debug!("Updating {} in {}", id, collection);

        let Some(update) = set_update(&set)? else {
            let matched = self
                .collection(collection)
                .count_documents(selector)
                .await
                .map_err(|e| query_failed("count_documents", e))?;
            return Ok(UpdateResult::new(matched, 0));
        };

        let result = self
            .collection(collection)
            .update_one(selector, update)
            .await
            .map_err(|e| query_failed("update_one", e))?;

        Ok(UpdateResult::new(result.matched_count, result.modified_count))
    }

    async fn delete_one(&self, collection: Collection, id: DocumentId) -> Result<DeleteResult, StoreError> {
        debug!("Deleting {} from {}", id, collection);

        let result = self
            .collection(collection)
            .delete_one(doc! { "_id": id.object_id() })
            .await
            .map_err(|e| query_failed("delete_one", e))?;

        Ok(DeleteResult::new(result.deleted_count))
    }

    async fn count(&self, collection: Collection, filter: Filter) -> Result<u64, StoreError> {
        let query = filter_to_bson(&filter)?;

        self.collection(collection)
            .count_documents(query)
            .await
            .map_err(|e| query_failed("count_documents", e))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::ConnectionFailed(format!("MongoDB ping failed: {}", e)))?;
        debug!("MongoDB health check passed");
        Ok(())
    }
}
