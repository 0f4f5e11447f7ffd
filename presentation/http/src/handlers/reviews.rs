//! Review handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use espresso_core::prelude::*;
use tracing::debug;

use crate::extract::{JsonBody, PathId, RequesterId, TokenPath};
use crate::{handle_core_error, ApiError, AppState, ReviewDeletedResponse};

pub const REVIEW_DELETED: &str = "Review deleted successfully";

/// `POST /reviews`; `createdAt` is always set by the server
pub async fn create_review(
    State(state): State<AppState>,
    JsonBody(review): JsonBody,
) -> Result<(StatusCode, Json<InsertOneResult>), ApiError> {
    let result = state.emporium.create_review(review).await.map_err(handle_core_error)?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// `GET /reviews/:id` where the segment is the reviewed product's id
pub async fn list_reviews(
    State(state): State<AppState>,
    TokenPath(coffee_id): TokenPath,
) -> Result<Json<Vec<Document>>, ApiError> {
    state
        .emporium
        .list_reviews(&coffee_id)
        .await
        .map(Json)
        .map_err(handle_core_error)
}

/// `DELETE /reviews/:id?requesterId=`
///
/// Both ids must be well formed before any lookup happens. The requester is
/// identified only by the query parameter.
pub async fn delete_review(
    State(state): State<AppState>,
    PathId(review_id): PathId,
    RequesterId(requester_id): RequesterId,
) -> Result<Json<ReviewDeletedResponse>, ApiError> {
    debug!("User {} requested deletion of review {}", requester_id, review_id);

    let result = state
        .emporium
        .delete_review(review_id, requester_id)
        .await
        .map_err(handle_core_error)?;

    Ok(Json(ReviewDeletedResponse {
        message: REVIEW_DELETED.to_string(),
        result,
    }))
}
