//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and non-empty paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    BadBindAddress(String),

    #[error("storage.images_per_page must be at least 1")]
    ZeroPageSize,

    #[error("storage.database_path must not be empty")]
    EmptyDatabasePath,

    #[error("storage.images_dir must not be empty")]
    EmptyImagesDir,

    #[error("upload.max_file_size must be at least 1 byte")]
    ZeroMaxFileSize,

    #[error("upload.allowed_extensions entry {0:?} must start with a dot")]
    BadExtension(String),

    #[error("timeouts.request_secs must be at least 1")]
    ZeroRequestTimeout,
}

/// Check a deserialized config for semantic problems.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.storage.images_per_page == 0 {
        errors.push(ValidationError::ZeroPageSize);
    }
    if config.storage.database_path.is_empty() {
        errors.push(ValidationError::EmptyDatabasePath);
    }
    if config.storage.images_dir.is_empty() {
        errors.push(ValidationError::EmptyImagesDir);
    }
    if config.upload.max_file_size == 0 {
        errors.push(ValidationError::ZeroMaxFileSize);
    }
    for ext in &config.upload.allowed_extensions {
        if !ext.starts_with('.') || ext.len() < 2 {
            errors.push(ValidationError::BadExtension(ext.clone()));
        }
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.storage.images_per_page = 0;
        config.upload.allowed_extensions.push("png".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::ZeroPageSize));
        assert!(errors.contains(&ValidationError::BadExtension("png".into())));
    }
}
