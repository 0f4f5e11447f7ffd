//! Product handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use espresso_core::prelude::*;

use crate::extract::{JsonBody, MessageQuery, PathId};
use crate::{handle_core_error, ApiError, AppState, ProductListParams};

pub const PRODUCT_NOT_FOUND: &str = "Product not found";

pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(product): JsonBody,
) -> Result<(StatusCode, Json<InsertOneResult>), ApiError> {
    let result = state.emporium.create_product(product).await.map_err(handle_core_error)?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// `GET /products?search=` matches name or company
pub async fn list_products(
    State(state): State<AppState>,
    MessageQuery(params): MessageQuery<ProductListParams>,
) -> Result<Json<Vec<Document>>, ApiError> {
    state
        .emporium
        .list_products(params.search)
        .await
        .map(Json)
        .map_err(handle_core_error)
}

pub async fn get_product(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<Document>, ApiError> {
    state
        .emporium
        .find_product(id)
        .await
        .map_err(handle_core_error)?
        .map(Json)
        .ok_or_else(|| handle_core_error(CoreError::NotFound(PRODUCT_NOT_FOUND.to_string())))
}

pub async fn update_product(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(set): JsonBody,
) -> Result<Json<UpdateResult>, ApiError> {
    state.emporium.update_product(id, set).await.map(Json).map_err(handle_core_error)
}

pub async fn delete_product(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<DeleteResult>, ApiError> {
    state.emporium.delete_product(id).await.map(Json).map_err(handle_core_error)
}
