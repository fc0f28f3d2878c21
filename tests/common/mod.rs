//! Shared utilities for integration testing.

use std::time::Duration;

use tempfile::TempDir;
use tokio::net::TcpListener;

use image_hosting::config::ServerConfig;
use image_hosting::lifecycle::Shutdown;
use image_hosting::storage::{ImageDirectory, ImageStore};
use image_hosting::HttpServer;

/// A tiny but valid 1x1 PNG.
pub const PNG_1X1: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // signature
    0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15,
    0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, // IDAT
    0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00,
    0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82, // IEND
];

/// A running server plus the temp storage backing it.
pub struct TestServer {
    pub base_url: String,
    pub shutdown: Shutdown,
    _dir: TempDir,
}

/// Start a server on an ephemeral port with temp-dir storage.
pub async fn start_server(images_per_page: u32) -> TestServer {
    let dir = tempfile::tempdir().unwrap();

    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.storage.database_path = dir.path().join("images.db").display().to_string();
    config.storage.images_dir = dir.path().join("images").display().to_string();
    config.storage.images_per_page = images_per_page;

    let store = ImageStore::open(
        dir.path().join("images.db").as_path(),
        config.storage.images_per_page,
    )
    .unwrap();
    store.init_tables().await.unwrap();
    let images = ImageDirectory::create(&config.storage.images_dir).unwrap();

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(&config, store, images).unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    TestServer {
        base_url: format!("http://{addr}"),
        shutdown,
        _dir: dir,
    }
}

/// Multipart form with `bytes` as the `image` field, named `filename`.
pub fn image_form(filename: &str, bytes: Vec<u8>) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(bytes)
        .file_name(filename.to_string())
        .mime_str("application/octet-stream")
        .unwrap();
    reqwest::multipart::Form::new().part("image", part)
}
