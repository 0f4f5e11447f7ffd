//! Server configuration loaded from defaults, YAML and the environment

use crate::HttpServerConfig;
use espresso_adapter_in_memory::InMemoryConfig;
use espresso_adapter_mongodb::MongoConfig;
use espresso_core::errors::CoreError;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Which DocumentStore implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Mongodb,
}

/// Storage section of the server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub mongodb: MongoConfig,
    pub memory: InMemoryConfig,
}

/// Configuration for the espresso-server binary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Listening port
    pub port: u16,
    /// Allow cross-origin requests from any origin
    pub enable_cors: bool,
    pub storage: StorageConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
            storage: StorageConfig::default(),
        }
    }
}

/// Unprefixed variables honoured for compatibility with existing deployments
const LEGACY_ENV: [&str; 4] = ["PORT", "DB_USERS", "DB_PASSWORD", "MONGODB_URI"];

impl ServerConfig {
    /// Load configuration.
    ///
    /// Later sources win: built-in defaults, `espresso.yaml` in the working
    /// directory, the file given on the command line, `PORT`/`DB_USERS`/
    /// `DB_PASSWORD`/`MONGODB_URI`, then `ESPRESSO_*` variables with `__`
    /// separating nested keys.
    pub fn load(config_path: &Option<PathBuf>) -> Result<Self, CoreError> {
        let mut figment = Figment::from(Serialized::defaults(ServerConfig::default()));

        for path in ["espresso.yaml", "espresso.yml"] {
            if Path::new(path).exists() {
                figment = figment.merge(Yaml::file(path));
                break;
            }
        }

        if let Some(path) = config_path {
            if path.exists() {
                figment = figment.merge(Yaml::file(path));
            } else {
                return Err(CoreError::Configuration(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
        }

        figment = figment
            .merge(Env::raw().only(&LEGACY_ENV).map(|key| {
                let key = key.as_str();
                if key.eq_ignore_ascii_case("DB_USERS") {
                    "storage.mongodb.user".into()
                } else if key.eq_ignore_ascii_case("DB_PASSWORD") {
                    "storage.mongodb.password".into()
                } else if key.eq_ignore_ascii_case("MONGODB_URI") {
                    "storage.mongodb.uri".into()
                } else {
                    key.to_ascii_lowercase().into()
                }
            }))
            .merge(Env::prefixed("ESPRESSO_").split("__"));

        figment
            .extract()
            .map_err(|e| CoreError::Configuration(format!("Failed to parse configuration: {}", e)))
    }

    /// Socket address built from `host` and `port`
    pub fn bind_address(&self) -> Result<SocketAddr, CoreError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| CoreError::Configuration(format!("Invalid bind address {}:{}: {}", self.host, self.port, e)))
    }

    /// Settings for the HTTP listener
    pub fn http(&self) -> Result<HttpServerConfig, CoreError> {
        Ok(HttpServerConfig {
            bind_address: self.bind_address()?,
            enable_cors: self.enable_cors,
        })
    }
}
