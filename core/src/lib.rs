//! # Espresso Emporium Core
//!
//! Core types, the storage trait and the service logic for the Espresso
//! Emporium API. Storage backends implement [`DocumentStore`]; presentation
//! layers drive an [`Emporium`] built over one.

pub mod access;
pub mod errors;
pub mod service;
pub mod traits;
pub mod types;

// Re-export commonly used types and traits
pub use errors::{CoreError, CoreResult, StoreError, StoreResult};
pub use service::{Emporium, UserQuery};
pub use traits::DocumentStore;
pub use types::{Collection, Document, DocumentId, Filter};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::*;
    pub use crate::service::*;
    pub use crate::traits::*;
    pub use crate::types::*;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
}
