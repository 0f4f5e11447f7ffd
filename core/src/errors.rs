//! Error types for Espresso Emporium core operations

use thiserror::Error;

/// Main error type for service operations
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid ID: {0}")]
    InvalidId(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Document storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised by document storage backends
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Document conversion failed: {0}")]
    Serialization(String),
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type alias for storage operations
pub type StoreResult<T> = Result<T, StoreError>;
