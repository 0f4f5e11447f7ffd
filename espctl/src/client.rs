//! HTTP client for the Espresso Emporium API

use crate::config::EspctlConfig;
use espresso_core::errors::CoreError;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, error};

/// API client for Espresso Emporium
pub struct EspressoClient {
    client: Client,
    config: EspctlConfig,
}

impl EspressoClient {
    /// Create a new API client
    pub fn new(config: EspctlConfig) -> Result<Self, CoreError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| CoreError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Make a GET request
    pub async fn get(&self, path: &[&str]) -> Result<Response, CoreError> {
        let url = self.config.api_url(path)?;
        debug!("GET {}", url);
        send(self.client.get(url), "GET").await
    }

    /// Make a GET request with query parameters
    pub async fn get_with_query<Q: Serialize + ?Sized>(&self, path: &[&str], query: &Q) -> Result<Response, CoreError> {
        let url = self.config.api_url(path)?;
        debug!("GET {} (with query)", url);
        send(self.client.get(url).query(query), "GET").await
    }

    /// Make a DELETE request with query parameters
    pub async fn delete_with_query<Q: Serialize + ?Sized>(&self, path: &[&str], query: &Q) -> Result<Response, CoreError> {
        let url = self.config.api_url(path)?;
        debug!("DELETE {}", url);
        send(self.client.delete(url).query(query), "DELETE").await
    }

    /// Check the status and parse the JSON body.
    ///
    /// Error responses surface the server's `message` field when present.
    pub async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T, CoreError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| CoreError::Internal(format!("Failed to parse JSON response: {}", e)));
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        error!("API error {}: {}", status, body);

        Err(status_error(status, &body))
    }

    /// Get the configuration
    pub fn config(&self) -> &EspctlConfig {
        &self.config
    }
}

async fn send(request: RequestBuilder, method: &str) -> Result<Response, CoreError> {
    request
        .send()
        .await
        .map_err(|e| CoreError::Internal(format!("HTTP {} failed: {}", method, e)))
}

/// Map an error status and body onto a core error
pub fn status_error(status: StatusCode, body: &str) -> CoreError {
    let message = serde_json::from_str::<ApiMessage>(body)
        .map(|m| m.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::BAD_REQUEST => CoreError::InvalidId(message),
        StatusCode::FORBIDDEN => CoreError::Forbidden(message),
        StatusCode::NOT_FOUND => CoreError::NotFound(message),
        s if s.is_server_error() => CoreError::Internal(format!("Server error: {}", message)),
        s => CoreError::Internal(format!("HTTP error {}: {}", s, message)),
    }
}

/// Health check response
#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: Option<String>,
    pub timestamp: String,
}

/// `{"message": ...}` body returned by the server
#[derive(Debug, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}
