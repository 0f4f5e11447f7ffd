//! CLI argument definitions

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "espctl")]
#[command(about = "Espresso Emporium control tool")]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Espresso Emporium API endpoint URL
    #[arg(short, long, global = true)]
    pub endpoint: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format
    #[arg(short = 'f', long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Health check
    Health,
    /// User operations
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Product catalog operations
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Shopping cart operations
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Review operations
    Reviews {
        #[command(subcommand)]
        command: ReviewCommands,
    },
    /// Aggregate counts for the admin dashboard
    Stats,
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List users
    List {
        /// Exact role (Buyer, Seller, Admin)
        #[arg(short, long)]
        role: Option<String>,
        /// Case-insensitive name fragment
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show a user by id or email
    Get {
        /// User id or email address
        user: String,
    },
}

#[derive(Subcommand)]
pub enum ProductCommands {
    /// List products
    List {
        /// Case-insensitive name or company fragment
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show a single product
    Get {
        /// Product id
        product_id: String,
    },
}

#[derive(Subcommand)]
pub enum CartCommands {
    /// List a buyer's cart items
    List {
        /// Buyer id
        buyer_id: String,
    },
}

#[derive(Subcommand)]
pub enum ReviewCommands {
    /// List reviews of a product
    List {
        /// Product id
        coffee_id: String,
    },
    /// Delete a review as the given user
    Delete {
        /// Review id
        review_id: String,
        /// Id of the user performing the deletion
        #[arg(short, long)]
        requester: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_review_delete() {
        let cli = Cli::parse_from([
            "espctl",
            "--format",
            "json",
            "reviews",
            "delete",
            "507f1f77bcf86cd799439011",
            "--requester",
            "507f191e810c19729de860ea",
        ]);

        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Commands::Reviews {
                command: ReviewCommands::Delete { review_id, requester, force },
            } => {
                assert_eq!(review_id, "507f1f77bcf86cd799439011");
                assert_eq!(requester, "507f191e810c19729de860ea");
                assert!(!force);
            }
            _ => panic!("expected reviews delete"),
        }
    }
}
