//! Health check command implementation

use crate::client::{EspressoClient, HealthResponse};
use crate::config::EspctlConfig;
use colored::*;
use espresso_core::errors::CoreError;
use tracing::info;

/// Handle health check command
pub async fn handle_health_command(config: &EspctlConfig) -> Result<(), CoreError> {
    let client = EspressoClient::new(config.clone())?;

    info!("Checking Espresso Emporium health at {}", config.endpoint);

    match check_health(&client).await {
        Ok(health) => {
            println!("{}", "✓ Espresso Emporium is healthy".green().bold());
            println!("Status: {}", health.status.green());
            if let Some(version) = health.version {
                println!("Version: {}", version);
            }
            println!("Timestamp: {}", health.timestamp);
            Ok(())
        }
        Err(e) => {
            println!("{}", "✗ Espresso Emporium health check failed".red().bold());
            println!("Error: {}", e.to_string().red());
            Err(e)
        }
    }
}

async fn check_health(client: &EspressoClient) -> Result<HealthResponse, CoreError> {
    let response = client.get(&["health"]).await?;
    client.handle_response(response).await
}
