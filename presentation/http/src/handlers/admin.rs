//! Admin handlers

use axum::{extract::State, response::Json};
use espresso_core::prelude::*;

use crate::{handle_core_error, ApiError, AppState};

/// `GET /admin/stats`
pub async fn stats(State(state): State<AppState>) -> Result<Json<AdminStats>, ApiError> {
    state.emporium.stats().await.map(Json).map_err(handle_core_error)
}
