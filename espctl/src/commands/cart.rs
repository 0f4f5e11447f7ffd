//! Cart command implementations

use crate::cli::CartCommands;
use crate::client::EspressoClient;
use crate::config::EspctlConfig;
use crate::output::{self, DocumentKind};
use espresso_core::errors::CoreError;
use espresso_core::types::Document;
use tracing::info;

/// Handle cart commands
pub async fn handle_cart_command(command: CartCommands, config: &EspctlConfig) -> Result<(), CoreError> {
    let client = EspressoClient::new(config.clone())?;

    match command {
        CartCommands::List { buyer_id } => {
            info!("Listing cart of buyer {}", buyer_id);

            let response = client.get(&["cart", buyer_id.as_str()]).await?;
            let items: Vec<Document> = client.handle_response(response).await?;

            output::display_documents(&items, DocumentKind::CartItem, &config.default_format)
        }
    }
}
