//! Admin statistics command

use crate::client::EspressoClient;
use crate::config::EspctlConfig;
use crate::output;
use espresso_core::errors::CoreError;
use espresso_core::types::AdminStats;

pub async fn handle_stats_command(config: &EspctlConfig) -> Result<(), CoreError> {
    let client = EspressoClient::new(config.clone())?;

    let response = client.get(&["admin", "stats"]).await?;
    let stats: AdminStats = client.handle_response(response).await?;

    output::display_stats(&stats, &config.default_format)
}
