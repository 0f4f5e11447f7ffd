//! Liveness handlers

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
use tracing::warn;

use crate::{ApiError, AppState, MessageResponse};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// `GET /`
pub async fn hello() -> &'static str {
    "Hello World!"
}

/// `GET /health`, 503 when the store does not answer
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthStatus>, ApiError> {
    match state.emporium.health_check().await {
        Ok(()) => Ok(Json(HealthStatus {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        })),
        Err(e) => {
            warn!("Health check failed: {}", e);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(MessageResponse::new(format!("Store unhealthy: {}", e))),
            ))
        }
    }
}
