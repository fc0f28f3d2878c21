//! Image-hosting backend.
//!
//! Clients upload images over multipart POST; the server validates and
//! stores them on disk, records metadata in SQLite, and serves a paginated
//! JSON listing plus delete-by-id. Dispatch goes through a small custom
//! route table compiled from templates like `/delete/<image_id>` and
//! `/api/images/?page=?`.
//!
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!                 │               IMAGE HOSTING                  │
//!                 │                                              │
//!   Request ──────┼─▶ http/server ──▶ routing (template match) ──┼──┐
//!                 │                                              │  │
//!                 │        ┌─────────────────────────────────────┼──┘
//!                 │        ▼                                     │
//!                 │   handlers (list / upload / delete)          │
//!                 │        │                                     │
//!                 │        ▼                                     │
//!   Response ◀────┼── storage (SQLite metadata + image files)    │
//!                 │                                              │
//!                 │  cross-cutting: config, observability,       │
//!                 │  lifecycle (graceful shutdown)               │
//!                 └──────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use image_hosting::config::{self, ServerConfig};
use image_hosting::lifecycle::{watch_signals, Shutdown};
use image_hosting::observability::init_logging;
use image_hosting::storage::{ImageDirectory, ImageStore};
use image_hosting::HttpServer;

#[derive(Parser)]
#[command(name = "image-hosting")]
#[command(about = "Image hosting HTTP backend", long_about = None)]
struct Cli {
    /// Path to a TOML config file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    init_logging(&config.observability.log_filter);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        database_path = %config.storage.database_path,
        images_dir = %config.storage.images_dir,
        "Configuration loaded"
    );

    let store = ImageStore::open(
        Path::new(&config.storage.database_path),
        config.storage.images_per_page,
    )?;
    store.init_tables().await?;
    let images = ImageDirectory::create(&config.storage.images_dir)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let server = HttpServer::new(&config, store, images)?;

    let shutdown = Arc::new(Shutdown::new());
    let signal_shutdown = Arc::clone(&shutdown);
    tokio::spawn(async move {
        watch_signals(&signal_shutdown).await;
    });

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
