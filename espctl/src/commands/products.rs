//! Product command implementations

use crate::cli::ProductCommands;
use crate::client::EspressoClient;
use crate::config::EspctlConfig;
use crate::output::{self, DocumentKind};
use espresso_core::errors::CoreError;
use espresso_core::types::Document;
use tracing::info;

/// Handle product commands
pub async fn handle_product_command(command: ProductCommands, config: &EspctlConfig) -> Result<(), CoreError> {
    let client = EspressoClient::new(config.clone())?;

    match command {
        ProductCommands::List { search } => {
            info!("Listing products (search: {:?})", search);

            let query: Vec<(&str, String)> = search.into_iter().map(|s| ("search", s)).collect();
            let response = client.get_with_query(&["products"], &query).await?;
            let products: Vec<Document> = client.handle_response(response).await?;

            output::display_documents(&products, DocumentKind::Product, &config.default_format)
        }
        ProductCommands::Get { product_id } => {
            info!("Fetching product {}", product_id);

            let response = client.get(&["products", product_id.as_str()]).await?;
            let product: Document = client.handle_response(response).await?;

            output::display_document(&product, "Product Details", &config.default_format)
        }
    }
}
