//! In-memory implementation of DocumentStore for testing and development

use async_trait::async_trait;
use espresso_core::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Configuration for in-memory store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemoryConfig {
    /// Maximum number of documents per collection
    pub max_documents: Option<usize>,
    /// Whether to enable verbose logging
    pub verbose: bool,
}

impl Default for InMemoryConfig {
    fn default() -> Self {
        Self {
            max_documents: Some(100_000),
            verbose: false,
        }
    }
}

/// One collection's documents plus their insertion order
#[derive(Debug, Default)]
struct CollectionData {
    /// Documents indexed by id
    documents: HashMap<DocumentId, Document>,
    /// Ids in insertion order
    order: Vec<DocumentId>,
}

impl CollectionData {
    fn insert(&mut self, id: DocumentId, document: Document) {
        self.documents.insert(id, document);
        self.order.push(id);
    }

    fn remove(&mut self, id: DocumentId) -> bool {
        if self.documents.remove(&id).is_some() {
            self.order.retain(|&doc_id| doc_id != id);
            true
        } else {
            false
        }
    }

    fn iter_matching<'a>(&'a self, filter: &'a Filter) -> impl Iterator<Item = &'a Document> + 'a {
        self.order
            .iter()
            .filter_map(move |id| self.documents.get(id))
            .filter(move |doc| filter.matches(doc))
    }

    fn len(&self) -> usize {
        self.documents.len()
    }
}

/// In-memory data store
#[derive(Debug, Default)]
struct MemoryStore {
    collections: HashMap<Collection, CollectionData>,
}

impl MemoryStore {
    fn collection(&self, collection: Collection) -> Option<&CollectionData> {
        self.collections.get(&collection)
    }

    fn collection_mut(&mut self, collection: Collection) -> &mut CollectionData {
        self.collections.entry(collection).or_default()
    }

    fn stats(&self) -> HashMap<Collection, usize> {
        Collection::ALL
            .iter()
            .map(|&c| (c, self.collection(c).map_or(0, CollectionData::len)))
            .collect()
    }
}

/// In-memory DocumentStore implementation
pub struct InMemoryStore {
    store: Arc<RwLock<MemoryStore>>,
    config: InMemoryConfig,
}

impl InMemoryStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::new_with_config(InMemoryConfig::default())
    }

    /// Create a new in-memory store with configuration
    pub fn new_with_config(config: InMemoryConfig) -> Self {
        info!("Creating in-memory store with config: {:?}", config);
        Self {
            store: Arc::new(RwLock::new(MemoryStore::default())),
            config,
        }
    }

    /// Document counts per collection
    pub async fn stats(&self) -> HashMap<Collection, usize> {
        let store = self.store.read().await;
        store.stats()
    }

    /// Clear all data from the store
    pub async fn clear(&self) {
        let mut store = self.store.write().await;
        *store = MemoryStore::default();
        info!("Cleared in-memory store");
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert_one(&self, collection: Collection, mut document: Document) -> Result<InsertOneResult, StoreError> {
        let mut store = self.store.write().await;
        let data = store.collection_mut(collection);

        if let Some(max_documents) = self.config.max_documents {
            if data.len() >= max_documents {
                return Err(StoreError::ConstraintViolation(format!(
                    "Maximum document limit ({}) reached for {}",
                    max_documents, collection
                )));
            }
        }

        let id = DocumentId::new();
        document.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));
        data.insert(id, document);

        if self.config.verbose {
            debug!("Inserted {} into {}", id, collection);
        }

        Ok(InsertOneResult::new(id))
    }

    async fn find_one(&self, collection: Collection, filter: Filter) -> Result<Option<Document>, StoreError> {
        let store = self.store.read().await;

        if self.config.verbose {
            debug!("find_one on {}: {:?}", collection, filter);
        }

        // Primary key lookups skip the scan
        if let Filter::Id(id) = filter {
            return Ok(store
                .collection(collection)
                .and_then(|data| data.documents.get(&id))
                .cloned());
        }

        Ok(store
            .collection(collection)
            .and_then(|data| data.iter_matching(&filter).next().cloned()))
    }

    async fn find(&self, collection: Collection, filter: Filter) -> Result<Vec<Document>, StoreError> {
        let store = self.store.read().await;

        if self.config.verbose {
            debug!("find on {}: {:?}", collection, filter);
        }

        Ok(store
            .collection(collection)
            .map(|data| data.iter_matching(&filter).cloned().collect())
            .unwrap_or_default())
    }

    async fn update_one(&self, collection: Collection, id: DocumentId, set: Document) -> Result<UpdateResult, StoreError> {
        let mut store = self.store.write().await;

        let Some(document) = store.collection_mut(collection).documents.get_mut(&id) else {
            return Ok(UpdateResult::new(0, 0));
        };

        let mut modified = false;
        for (key, value) in set {
            if key == ID_FIELD {
                continue;
            }
            if document.get(&key) != Some(&value) {
                document.insert(key, value);
                modified = true;
            }
        }

        if self.config.verbose {
            debug!("Updated {} in {} (modified: {})", id, collection, modified);
        }

        Ok(UpdateResult::new(1, u64::from(modified)))
    }

    async fn delete_one(&self, collection: Collection, id: DocumentId) -> Result<DeleteResult, StoreError> {
        let mut store = self.store.write().await;

        let deleted = store.collection_mut(collection).remove(id);

        if self.config.verbose && deleted {
            debug!("Deleted {} from {}", id, collection);
        }

        Ok(DeleteResult::new(u64::from(deleted)))
    }

    async fn count(&self, collection: Collection, filter: Filter) -> Result<u64, StoreError> {
        let store = self.store.read().await;

        Ok(store
            .collection(collection)
            .map_or(0, |data| data.iter_matching(&filter).count() as u64))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let stats = self.stats().await;
        debug!("In-memory store health check: {:?}", stats);
        Ok(())
    }
}
