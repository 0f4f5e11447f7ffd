//! Storage seam implemented by every backend

use crate::errors::StoreError;
use crate::types::{Collection, DeleteResult, Document, DocumentId, Filter, InsertOneResult, UpdateResult};
use async_trait::async_trait;

/// Core trait for document storage backends
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document; the store assigns a fresh `_id`
    async fn insert_one(&self, collection: Collection, document: Document) -> Result<InsertOneResult, StoreError>;

    /// First document matching the filter, in insertion order
    async fn find_one(&self, collection: Collection, filter: Filter) -> Result<Option<Document>, StoreError>;

    /// Every document matching the filter, in insertion order
    async fn find(&self, collection: Collection, filter: Filter) -> Result<Vec<Document>, StoreError>;

    /// Shallow field replacement on the document with the given id
    async fn update_one(&self, collection: Collection, id: DocumentId, set: Document) -> Result<UpdateResult, StoreError>;

    /// Remove the document with the given id, if present
    async fn delete_one(&self, collection: Collection, id: DocumentId) -> Result<DeleteResult, StoreError>;

    /// Number of documents matching the filter
    async fn count(&self, collection: Collection, filter: Filter) -> Result<u64, StoreError>;

    /// Test the connection to the storage backend
    async fn health_check(&self) -> Result<(), StoreError>;
}
