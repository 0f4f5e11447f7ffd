//! Cart handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use espresso_core::prelude::*;

use crate::extract::{JsonBody, PathId, TokenPath};
use crate::{handle_core_error, ApiError, AppState};

pub async fn add_cart_item(
    State(state): State<AppState>,
    JsonBody(item): JsonBody,
) -> Result<(StatusCode, Json<InsertOneResult>), ApiError> {
    let result = state.emporium.add_cart_item(item).await.map_err(handle_core_error)?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// `GET /cart/:id` where the segment is a buyer id, matched as a plain string
pub async fn list_cart_items(
    State(state): State<AppState>,
    TokenPath(buyer_id): TokenPath,
) -> Result<Json<Vec<Document>>, ApiError> {
    state
        .emporium
        .list_cart_items(&buyer_id)
        .await
        .map(Json)
        .map_err(handle_core_error)
}

pub async fn delete_cart_item(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<DeleteResult>, ApiError> {
    state.emporium.delete_cart_item(id).await.map(Json).map_err(handle_core_error)
}
