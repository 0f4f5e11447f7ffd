//! The Espresso Emporium service: every API operation over an injected store

use crate::access::{authorize_review_deletion, REQUESTER_UNKNOWN};
use crate::errors::{CoreError, CoreResult};
use crate::traits::DocumentStore;
use crate::types::*;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const REVIEW_NOT_FOUND: &str = "Review not found";
pub const COFFEE_NOT_FOUND: &str = "Coffee not found";

/// Search parameters for listing users
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    /// Exact role match
    pub role: Option<String>,
    /// Case-insensitive substring of `name`
    pub search: Option<String>,
}

/// Application service shared by all request handlers
#[derive(Clone)]
pub struct Emporium {
    store: Arc<dyn DocumentStore>,
}

impl Emporium {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Access the underlying store
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub async fn health_check(&self) -> CoreResult<()> {
        Ok(self.store.health_check().await?)
    }

    // ----- users -----

    /// Create a user unless one with the same email already exists
    pub async fn register_user(&self, user: Document) -> CoreResult<Registration> {
        let email = user.get("email").cloned().unwrap_or(Value::Null);

        let existing = self
            .store
            .find_one(Collection::Users, Filter::Eq("email".to_string(), email.clone()))
            .await?;
        if existing.is_some() {
            debug!("Registration skipped, email {} already present", email);
            return Ok(Registration::AlreadyExists);
        }

        let result = self.store.insert_one(Collection::Users, user).await?;
        info!("Registered user {}", result.inserted_id);
        Ok(Registration::Created(result))
    }

    /// Look a user up by identifier first, then by email
    pub async fn find_user(&self, token: &str) -> CoreResult<Option<Document>> {
        if let Ok(id) = DocumentId::parse(token) {
            if let Some(user) = self.store.find_one(Collection::Users, Filter::id(id)).await? {
                return Ok(Some(user));
            }
        }

        Ok(self
            .store
            .find_one(Collection::Users, Filter::eq("email", token))
            .await?)
    }

    pub async fn list_users(&self, query: UserQuery) -> CoreResult<Vec<Document>> {
        let mut filters = Vec::new();
        if let Some(role) = non_empty(query.role) {
            filters.push(Filter::eq("role", role));
        }
        if let Some(search) = non_empty(query.search) {
            filters.push(Filter::contains("name", search));
        }

        let users = self.store.find(Collection::Users, Filter::And(filters)).await?;
        debug!("Listed {} users", users.len());
        Ok(users)
    }

    pub async fn update_user(&self, id: DocumentId, set: Document) -> CoreResult<UpdateResult> {
        info!("Updating user {}", id);
        Ok(self.store.update_one(Collection::Users, id, set).await?)
    }

    pub async fn delete_user(&self, id: DocumentId) -> CoreResult<DeleteResult> {
        info!("Deleting user {}", id);
        Ok(self.store.delete_one(Collection::Users, id).await?)
    }

    // ----- products -----

    pub async fn create_product(&self, product: Document) -> CoreResult<InsertOneResult> {
        let result = self.store.insert_one(Collection::Products, product).await?;
        info!("Created product {}", result.inserted_id);
        Ok(result)
    }

    /// Products whose name or company contains `search`, case-insensitively
    pub async fn list_products(&self, search: Option<String>) -> CoreResult<Vec<Document>> {
        let filter = match non_empty(search) {
            Some(search) => Filter::Or(vec![
                Filter::contains("name", search.clone()),
                Filter::contains("company", search),
            ]),
            None => Filter::All,
        };

        let products = self.store.find(Collection::Products, filter).await?;
        debug!("Listed {} products", products.len());
        Ok(products)
    }

    pub async fn find_product(&self, id: DocumentId) -> CoreResult<Option<Document>> {
        Ok(self.store.find_one(Collection::Products, Filter::id(id)).await?)
    }

    pub async fn update_product(&self, id: DocumentId, set: Document) -> CoreResult<UpdateResult> {
        info!("Updating product {}", id);
        Ok(self.store.update_one(Collection::Products, id, set).await?)
    }

    pub async fn delete_product(&self, id: DocumentId) -> CoreResult<DeleteResult> {
        info!("Deleting product {}", id);
        Ok(self.store.delete_one(Collection::Products, id).await?)
    }

    // ----- cart -----

    pub async fn add_cart_item(&self, item: Document) -> CoreResult<InsertOneResult> {
        let result = self.store.insert_one(Collection::Cart, item).await?;
        info!("Added cart item {}", result.inserted_id);
        Ok(result)
    }

    pub async fn list_cart_items(&self, buyer_id: &str) -> CoreResult<Vec<Document>> {
        Ok(self
            .store
            .find(Collection::Cart, Filter::eq("buyerId", buyer_id))
            .await?)
    }

    pub async fn delete_cart_item(&self, id: DocumentId) -> CoreResult<DeleteResult> {
        info!("Deleting cart item {}", id);
        Ok(self.store.delete_one(Collection::Cart, id).await?)
    }

    // ----- reviews -----

    /// Insert a review stamped with the server's current time
    pub async fn create_review(&self, mut review: Document) -> CoreResult<InsertOneResult> {
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        review.insert(CREATED_AT_FIELD.to_string(), Value::String(created_at));

        let result = self.store.insert_one(Collection::Reviews, review).await?;
        info!("Created review {}", result.inserted_id);
        Ok(result)
    }

    pub async fn list_reviews(&self, coffee_id: &str) -> CoreResult<Vec<Document>> {
        Ok(self
            .store
            .find(Collection::Reviews, Filter::eq("coffeeId", coffee_id))
            .await?)
    }

    /// Delete a review on behalf of `requester_id`.
    ///
    /// Checks run in a fixed order: the review must exist, the requester must
    /// be a known user, the reviewed product must still exist, and the
    /// requester must be an Admin or the product's seller.
    pub async fn delete_review(&self, review_id: DocumentId, requester_id: DocumentId) -> CoreResult<DeleteResult> {
        let review = self
            .store
            .find_one(Collection::Reviews, Filter::id(review_id))
            .await?
            .map(|doc| ReviewView::from_document(&doc))
            .ok_or_else(|| CoreError::NotFound(REVIEW_NOT_FOUND.to_string()))?;

        let requester = self
            .store
            .find_one(Collection::Users, Filter::id(requester_id))
            .await?
            .map(|doc| UserView::from_document(&doc))
            .ok_or_else(|| CoreError::Forbidden(REQUESTER_UNKNOWN.to_string()))?;

        let coffee_id = review
            .coffee_id
            .as_deref()
            .and_then(|id| DocumentId::parse(id).ok())
            .ok_or_else(|| CoreError::NotFound(COFFEE_NOT_FOUND.to_string()))?;

        let product = self
            .store
            .find_one(Collection::Products, Filter::id(coffee_id))
            .await?
            .map(|doc| ProductView::from_document(&doc))
            .ok_or_else(|| CoreError::NotFound(COFFEE_NOT_FOUND.to_string()))?;

        if let Err(e) = authorize_review_deletion(&requester, &product) {
            warn!("User {} denied deletion of review {}", requester_id, review_id);
            return Err(e);
        }

        let result = self.store.delete_one(Collection::Reviews, review_id).await?;
        info!("User {} deleted review {}", requester_id, review_id);
        Ok(result)
    }

    // ----- admin -----

    pub async fn stats(&self) -> CoreResult<AdminStats> {
        let total_buyers = self
            .store
            .count(Collection::Users, Filter::eq("role", Role::Buyer.as_str()))
            .await?;
        let total_sellers = self
            .store
            .count(Collection::Users, Filter::eq("role", Role::Seller.as_str()))
            .await?;
        let total_products = self.store.count(Collection::Products, Filter::All).await?;
        let total_reviews = self.store.count(Collection::Reviews, Filter::All).await?;

        Ok(AdminStats {
            total_buyers,
            total_sellers,
            total_products,
            total_reviews,
        })
    }
}

fn non_empty(param: Option<String>) -> Option<String> {
    param.filter(|s| !s.is_empty())
}
