//! Configuration management for espctl

use crate::cli::{Cli, OutputFormat};
use espresso_core::errors::CoreError;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the espctl CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EspctlConfig {
    /// Espresso Emporium API endpoint
    pub endpoint: String,
    /// Default output format
    pub default_format: OutputFormat,
    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for EspctlConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000".to_string(),
            default_format: OutputFormat::Table,
            timeout: 30,
        }
    }
}

impl EspctlConfig {
    /// Load configuration from defaults, file and environment
    pub fn load(config_path: &Option<PathBuf>) -> Result<Self, CoreError> {
        let mut figment = Figment::from(Serialized::defaults(EspctlConfig::default()));

        // Load from default config file if it exists
        let default_config_paths = ["espctl.yaml", "espctl.yml", ".espctl.yaml", ".espctl.yml"];
        for path in &default_config_paths {
            if Path::new(path).exists() {
                figment = figment.merge(Yaml::file(path));
                break;
            }
        }

        // Load from specified config file
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

        // Load from environment variables (prefixed with ESPCTL_)
        figment = figment.merge(Env::prefixed("ESPCTL_"));

        // Extract the configuration
        figment
            .extract()
            .map_err(|e| CoreError::Configuration(format!("Failed to parse configuration: {}", e)))
    }

    /// Apply CLI argument overrides to the configuration
    pub fn with_overrides(mut self, args: &Cli) -> Self {
        if let Some(ref endpoint) = args.endpoint {
            self.endpoint = endpoint.clone();
        }

        if let Some(format) = args.format {
            self.default_format = format;
        }

        self
    }

    /// Full URL for an API path given as segments.
    ///
    /// Each segment is percent-encoded, so ids and emails cannot add path
    /// segments, a query or a fragment of their own.
    pub fn api_url(&self, segments: &[&str]) -> Result<Url, CoreError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| CoreError::Configuration(format!("Invalid endpoint {}: {}", self.endpoint, e)))?;

        url.path_segments_mut()
            .map_err(|_| CoreError::Configuration(format!("Endpoint cannot take a path: {}", self.endpoint)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }
}
