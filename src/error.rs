//! Error types
//!
//! Almost every failure in the response layer is recovered locally into a
//! substitute value (a not-found page, an absent cookie attribute, a missing
//! JSON payload). The variants here are the few that do surface.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `ResponseError`
pub type Result<T> = std::result::Result<T, ResponseError>;

#[derive(Debug, Error)]
pub enum ResponseError {
    // -------------------------------------------------------------------------
    // Render Errors
    // -------------------------------------------------------------------------
    /// The direct-transfer file vanished or became unreadable between
    /// response construction and rendering. No partial header is produced.
    #[error("failed to stat transfer file {}: {source}", path.display())]
    FileStat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Logger error: {0}")]
    Logger(String),
}
