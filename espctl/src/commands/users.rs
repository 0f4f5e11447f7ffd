//! User command implementations

use crate::cli::UserCommands;
use crate::client::EspressoClient;
use crate::config::EspctlConfig;
use crate::output::{self, DocumentKind};
use espresso_core::errors::CoreError;
use espresso_core::types::Document;
use tracing::info;

/// Handle user commands
pub async fn handle_user_command(command: UserCommands, config: &EspctlConfig) -> Result<(), CoreError> {
    let client = EspressoClient::new(config.clone())?;

    match command {
        UserCommands::List { role, search } => list_users(&client, role, search).await,
        UserCommands::Get { user } => get_user(&client, &user).await,
    }
}

async fn list_users(client: &EspressoClient, role: Option<String>, search: Option<String>) -> Result<(), CoreError> {
    info!("Listing users (role: {:?}, search: {:?})", role, search);

    let mut query = Vec::new();
    if let Some(role) = role {
        query.push(("role", role));
    }
    if let Some(search) = search {
        query.push(("search", search));
    }

    let response = client.get_with_query(&["users"], &query).await?;
    let users: Vec<Document> = client.handle_response(response).await?;

    output::display_documents(&users, DocumentKind::User, &client.config().default_format)
}

async fn get_user(client: &EspressoClient, user: &str) -> Result<(), CoreError> {
    info!("Fetching user {}", user);

    let response = client.get(&["users", user]).await?;
    let document: Document = client.handle_response(response).await?;

    output::display_document(&document, "User Details", &client.config().default_format)
}
