//! Image metadata store backed by SQLite.
//!
//! # Responsibilities
//! - Own the database connection and the `images` table
//! - Insert, page through and delete metadata rows
//!
//! # Design Decisions
//! - One connection behind a mutex; every call crosses to the blocking pool
//! - Pagination is plain LIMIT/OFFSET with a fixed page size from config
//! - `delete_image` reports whether a row existed so the handler can 404

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::{params, Connection};
use serde::Serialize;

use crate::storage::StoreError;

const INIT_TABLES: &str = "
CREATE TABLE IF NOT EXISTS images (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    filename      TEXT NOT NULL UNIQUE,
    original_name TEXT NOT NULL,
    size          INTEGER NOT NULL,
    upload_date   TEXT NOT NULL,
    file_type     TEXT NOT NULL
)";

/// One metadata row, shaped for the JSON listing.
#[derive(Debug, Clone, Serialize)]
pub struct ImageRecord {
    #[serde(skip)]
    pub id: i64,
    /// Stored filename stem (uuid, without extension).
    pub filename: String,
    /// Client-supplied name, without extension.
    pub original_name: String,
    /// Size in KiB, rounded.
    pub size: u32,
    /// `%Y-%m-%d %H:%M:%S`, UTC.
    pub upload_date: String,
    /// Extension including the leading dot, lowercase.
    pub file_type: String,
}

/// Metadata store for uploaded images.
#[derive(Clone)]
pub struct ImageStore {
    conn: Arc<Mutex<Connection>>,
    page_size: u32,
}

impl ImageStore {
    /// Open (or create) the database file.
    pub fn open(path: &Path, page_size: u32) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            page_size,
        })
    }

    /// Images returned per listing page.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, rusqlite::Error> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().unwrap_or_else(|e| e.into_inner());
            f(&conn).map_err(StoreError::from)
        })
        .await
        .map_err(|_| StoreError::TaskJoin)?
    }

    /// Create the `images` table if it does not exist yet.
    pub async fn init_tables(&self) -> Result<(), StoreError> {
        self.blocking(|conn| conn.execute(INIT_TABLES, []).map(|_| ()))
            .await
    }

    /// Insert one metadata row, stamped with the current UTC time.
    pub async fn add_image(
        &self,
        filename: String,
        original_name: String,
        size_kib: u32,
        file_type: String,
    ) -> Result<ImageRecord, StoreError> {
        let upload_date = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.blocking(move |conn| {
            conn.execute(
                "INSERT INTO images (filename, original_name, size, upload_date, file_type)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![filename, original_name, size_kib, upload_date, file_type],
            )?;
            Ok(ImageRecord {
                id: conn.last_insert_rowid(),
                filename,
                original_name,
                size: size_kib,
                upload_date,
                file_type,
            })
        })
        .await
    }

    /// Fetch one page of rows, newest upload first. `page` starts at 1.
    pub async fn get_images(&self, page: u32) -> Result<Vec<ImageRecord>, StoreError> {
        let limit = self.page_size;
        let offset = page.saturating_sub(1) * limit;
        self.blocking(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, filename, original_name, size, upload_date, file_type
                 FROM images ORDER BY id DESC LIMIT ?1 OFFSET ?2",
            )?;
            let rows = stmt.query_map(params![limit, offset], |row| {
                Ok(ImageRecord {
                    id: row.get(0)?,
                    filename: row.get(1)?,
                    original_name: row.get(2)?,
                    size: row.get(3)?,
                    upload_date: row.get(4)?,
                    file_type: row.get(5)?,
                })
            })?;
            rows.collect()
        })
        .await
    }

    /// Total number of stored images.
    pub async fn count_images(&self) -> Result<u64, StoreError> {
        self.blocking(|conn| {
            conn.query_row("SELECT COUNT(*) FROM images", [], |row| row.get::<_, i64>(0))
        })
        .await
        .map(|n| n as u64)
    }

    /// Delete by stored filename stem. Returns whether a row existed.
    pub async fn delete_image(&self, filename: String) -> Result<bool, StoreError> {
        self.blocking(move |conn| {
            let affected = conn.execute("DELETE FROM images WHERE filename = ?1", params![filename])?;
            Ok(affected > 0)
        })
        .await
    }
}
