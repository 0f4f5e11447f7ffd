//! Request and response bodies for the HTTP API

use serde::{Deserialize, Serialize};

/// Re-export core types for convenience
pub use espresso_core::types::*;

/// `{"message": ...}` body used for errors and simple acknowledgements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Query parameters for `GET /users`
#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    pub role: Option<String>,
    pub search: Option<String>,
}

/// Query parameters for `GET /products`
#[derive(Debug, Default, Deserialize)]
pub struct ProductListParams {
    pub search: Option<String>,
}

/// Query parameters for `DELETE /reviews/{id}`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReviewParams {
    pub requester_id: Option<String>,
}

/// Body returned after a review is deleted
#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewDeletedResponse {
    pub message: String,
    pub result: DeleteResult,
}
