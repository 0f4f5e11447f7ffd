//! Command-line interface for Espresso Emporium

use clap::Parser;
use std::process;
use tracing::{error, info, Level};

mod cli;
mod client;
mod commands;
mod config;
mod output;

use cli::*;
use config::EspctlConfig;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    // Load configuration
    let config = match EspctlConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Override config with CLI args
    let config = config.with_overrides(&args);

    info!("Starting espctl with endpoint: {}", config.endpoint);

    // Execute command
    let result = match args.command {
        Commands::Health => commands::health::handle_health_command(&config).await,
        Commands::Users { command } => commands::users::handle_user_command(command, &config).await,
        Commands::Products { command } => commands::products::handle_product_command(command, &config).await,
        Commands::Cart { command } => commands::cart::handle_cart_command(command, &config).await,
        Commands::Reviews { command } => commands::reviews::handle_review_command(command, &config).await,
        Commands::Stats => commands::stats::handle_stats_command(&config).await,
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
