//! Storage subsystem.
//!
//! # Data Flow
//! ```text
//! Upload handler
//!     → fs.rs (write image bytes under a uuid filename)
//!     → db.rs (insert metadata row)
//!
//! Listing handler
//!     → db.rs (SELECT with LIMIT/OFFSET pagination)
//!
//! Delete handler
//!     → db.rs (delete row by filename)
//!     → fs.rs (remove file from disk)
//! ```
//!
//! # Design Decisions
//! - Embedded SQLite keeps the metadata table local to the process
//! - Blocking rusqlite calls run on the blocking pool, never on the runtime
//! - The image directory owns all path construction; handlers never build
//!   filesystem paths themselves

pub mod db;
pub mod fs;

pub use db::{ImageRecord, ImageStore};
pub use fs::ImageDirectory;

use thiserror::Error;

/// Error type for metadata and file storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage task was cancelled")]
    TaskJoin,
}
