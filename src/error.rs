//! Error types for aclgate.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AclError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown principal: {0}")]
    UnknownPrincipal(String),

    #[error("Validation failed with {0} finding(s), aborting")]
    ValidationFailed(usize),

    #[error("Transport error on {host}: {message}")]
    Transport { host: String, message: String },

    #[error("Backup failed for {host}: {message}")]
    Backup { host: String, message: String },

    #[error("Lock error: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, AclError>;
