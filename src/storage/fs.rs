//! Image file storage on disk.
//!
//! # Responsibilities
//! - Own the images directory and all path construction
//! - Write uploaded bytes, remove files on delete
//!
//! # Design Decisions
//! - Stored names are `<uuid><ext>`; handlers never pass client-controlled
//!   paths down here, only names built from validated parts
//! - Removal of a missing file is reported, not an error, so delete stays
//!   idempotent on the filesystem side

use std::path::{Path, PathBuf};

use crate::storage::StoreError;

/// Directory holding the uploaded image files.
#[derive(Debug, Clone)]
pub struct ImageDirectory {
    root: PathBuf,
}

impl ImageDirectory {
    /// Use `root` as the images directory, creating it if missing.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Absolute-ish path of a stored file.
    pub fn path_of(&self, stored_name: &str) -> PathBuf {
        self.root.join(stored_name)
    }

    /// Directory root, for building public URLs.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write image bytes under `stored_name`.
    pub async fn save(&self, stored_name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        tokio::fs::write(self.path_of(stored_name), bytes).await?;
        Ok(())
    }

    /// Remove a stored file. Returns whether it existed.
    pub async fn remove(&self, stored_name: &str) -> Result<bool, StoreError> {
        match tokio::fs::remove_file(self.path_of(stored_name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
