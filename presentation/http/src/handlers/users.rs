//! User handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use espresso_core::prelude::*;
use tracing::debug;

use crate::extract::{JsonBody, MessageQuery, PathId, TokenPath};
use crate::{handle_core_error, ApiError, AppState, MessageResponse, UserListParams};

pub const USER_EXISTS: &str = "User already exists";
pub const USER_NOT_FOUND: &str = "User not found";

/// `POST /users`: 201 with the insert result, or 200 when the email is taken
pub async fn register_user(
    State(state): State<AppState>,
    JsonBody(user): JsonBody,
) -> Result<Response, ApiError> {
    let registration = state.emporium.register_user(user).await.map_err(handle_core_error)?;

    Ok(match registration {
        Registration::Created(result) => (StatusCode::CREATED, Json(result)).into_response(),
        Registration::AlreadyExists => Json(MessageResponse::new(USER_EXISTS)).into_response(),
    })
}

/// `GET /users/:id`, where the segment is an id or an email address
pub async fn get_user(
    State(state): State<AppState>,
    TokenPath(token): TokenPath,
) -> Result<Json<Document>, ApiError> {
    debug!("Looking up user {}", token);

    state
        .emporium
        .find_user(&token)
        .await
        .map_err(handle_core_error)?
        .map(Json)
        .ok_or_else(|| handle_core_error(CoreError::NotFound(USER_NOT_FOUND.to_string())))
}

/// `GET /users?role=&search=`
pub async fn list_users(
    State(state): State<AppState>,
    MessageQuery(params): MessageQuery<UserListParams>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let query = UserQuery {
        role: params.role,
        search: params.search,
    };

    state.emporium.list_users(query).await.map(Json).map_err(handle_core_error)
}

pub async fn update_user(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(set): JsonBody,
) -> Result<Json<UpdateResult>, ApiError> {
    state.emporium.update_user(id, set).await.map(Json).map_err(handle_core_error)
}

pub async fn delete_user(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<DeleteResult>, ApiError> {
    state.emporium.delete_user(id).await.map(Json).map_err(handle_core_error)
}
