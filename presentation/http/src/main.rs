//! espresso-server: the Espresso Emporium REST API

use clap::Parser;
use espresso_adapter_in_memory::InMemoryStore;
use espresso_adapter_mongodb::MongoStore;
use espresso_core::prelude::*;
use espresso_http::{HttpServer, ServerConfig, StorageBackend};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "espresso-server")]
#[command(about = "Espresso Emporium REST API server")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .with_target(false)
        .init();

    if let Err(e) = run(args).await {
        error!("Server failed: {}", e);
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), CoreError> {
    let config = ServerConfig::load(&args.config)?;
    let http_config = config.http()?;

    let store = connect_store(&config).await?;
    let emporium = Emporium::new(store);

    HttpServer::new(http_config).serve(emporium, shutdown_signal()).await
}

async fn connect_store(config: &ServerConfig) -> Result<Arc<dyn DocumentStore>, CoreError> {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            Ok(Arc::new(InMemoryStore::new_with_config(config.storage.memory.clone())))
        }
        StorageBackend::Mongodb => {
            let store = MongoStore::new(config.storage.mongodb.clone()).await?;
            Ok(Arc::new(store))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received SIGTERM, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
