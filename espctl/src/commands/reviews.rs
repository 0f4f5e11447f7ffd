//! Review command implementations

use crate::cli::ReviewCommands;
use crate::client::EspressoClient;
use crate::config::EspctlConfig;
use crate::output::{self, DocumentKind};
use colored::*;
use espresso_core::errors::CoreError;
use espresso_core::types::{DeleteResult, Document};
use serde::Deserialize;
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

/// Body returned by a successful review deletion
#[derive(Debug, Deserialize)]
struct ReviewDeleted {
    message: String,
    result: DeleteResult,
}

/// Handle review commands
pub async fn handle_review_command(command: ReviewCommands, config: &EspctlConfig) -> Result<(), CoreError> {
    let client = EspressoClient::new(config.clone())?;

    match command {
        ReviewCommands::List { coffee_id } => {
            info!("Listing reviews of product {}", coffee_id);

            let response = client.get(&["reviews", coffee_id.as_str()]).await?;
            let reviews: Vec<Document> = client.handle_response(response).await?;

            output::display_documents(&reviews, DocumentKind::Review, &config.default_format)
        }
        ReviewCommands::Delete { review_id, requester, force } => {
            delete_review(&client, &review_id, &requester, force).await
        }
    }
}

async fn delete_review(client: &EspressoClient, review_id: &str, requester: &str, force: bool) -> Result<(), CoreError> {
    if !force {
        print!("Delete review '{}'? This action cannot be undone. [y/N]: ", review_id);
        io::stdout()
            .flush()
            .map_err(|e| CoreError::Internal(format!("Failed to write prompt: {}", e)))?;

        let mut input = String::new();
        io::stdin()
            .lock()
            .read_line(&mut input)
            .map_err(|e| CoreError::Internal(format!("Failed to read confirmation: {}", e)))?;

        if !confirmed(&input) {
            println!("Deletion cancelled");
            return Ok(());
        }
    }

    warn!("Deleting review {} as user {}", review_id, requester);

    let response = client
        .delete_with_query(&["reviews", review_id], &[("requesterId", requester)])
        .await?;

    match client.handle_response::<ReviewDeleted>(response).await {
        Ok(deleted) => {
            println!(
                "{}",
                format!("✓ {} ({} removed)", deleted.message, deleted.result.deleted_count).green().bold()
            );
            Ok(())
        }
        Err(e) => {
            println!("{}", format!("✗ {}", e).red().bold());
            Err(e)
        }
    }
}

fn confirmed(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
