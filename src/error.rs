use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Network error for {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Failed to read response body from {url}: {reason}")]
    InvalidBody { url: String, reason: String },

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid catalog entry {path}: {reason}")]
    CatalogValidation { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

