//! Configuration types for the MongoDB adapter

use serde::{Deserialize, Serialize};

/// Configuration for a MongoDB connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    /// Connection string (e.g., mongodb+srv://cluster0.example.net/?retryWrites=true)
    pub uri: String,
    /// Username for authentication
    pub user: Option<String>,
    /// Password for authentication
    pub password: Option<String>,
    /// Database holding the four collections
    pub database: String,
    /// Application name reported to the server
    pub app_name: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: Option<u32>,
    /// Connection and server selection timeout in milliseconds
    pub connection_timeout_ms: u64,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            user: None,
            password: None,
            database: "espressoDB".to_string(),
            app_name: "espresso-emporium".to_string(),
            max_pool_size: None,
            connection_timeout_ms: 5000,
        }
    }
}

impl MongoConfig {
    /// Create a new config with the given URI
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Default::default()
        }
    }

    /// Set the authentication credentials
    pub fn with_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    /// Set the database name
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set the connection pool size
    pub fn with_max_pool_size(mut self, max_pool_size: u32) -> Self {
        self.max_pool_size = Some(max_pool_size);
        self
    }

    /// Set the connection timeout
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.connection_timeout_ms = timeout_ms;
        self
    }

    /// Whether both halves of the credential pair are present
    pub fn has_credentials(&self) -> bool {
        self.user.is_some() && self.password.is_some()
    }
}
