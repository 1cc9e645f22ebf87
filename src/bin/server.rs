//! Aftersales Ticket Server
//!
//! Run with: cargo run --bin aftersales-server
//!
//! # Configuration
//!
//! Settings come from `config.toml` (see `aftersales config`), overridden
//! by environment variables:
//! - `AFTERSALES_HOST`: Host to bind to (default: 0.0.0.0)
//! - `AFTERSALES_PORT`: Port to listen on (default: 8000)
//! - `AFTERSALES_DATABASE`: SQLite database file
//! - `RUST_LOG`: Log filter (overrides `[logging] level`)

use aftersales::api::{serve, AppState};
use aftersales::config::Config;
use aftersales::store::Store;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "aftersales-server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "REST backend for after-sales tickets")]
struct Args {
    /// Config file (default: search the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep everything in memory; nothing survives a restart
    #[arg(long)]
    memory: bool,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = Config::load_or_default(args.config.as_deref())?;
    aftersales::logging::init(&config.logging)?;

    tracing::info!("Starting Aftersales ticket server v{}", env!("CARGO_PKG_VERSION"));

    let mut api_config = config.server.to_api_config();
    if let Some(port) = args.port {
        api_config.port = port;
    }

    let store = if args.memory {
        tracing::warn!("Using in-memory database, tickets will not be persisted");
        Store::open_in_memory()?
    } else {
        tracing::info!("Database: {}", config.storage.database_path);
        Store::open(&config.storage.database_path)?
    };

    let state = AppState::new(Arc::new(store), api_config.clone());
    serve(state, &api_config).await?;

    tracing::info!("Aftersales ticket server stopped");
    Ok(())
}
