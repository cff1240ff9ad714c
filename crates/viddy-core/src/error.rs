//! Error types for the Viddy core library.
//!
//! Pinning operations swallow collaborator failures and report `false`;
//! everything else surfaces one of these variants.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the Viddy core library.
#[derive(Debug, Error)]
pub enum ViddyError {
    // Storage errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Platform collaborators
    #[error("Shortcut {operation} failed: {message}")]
    Shortcut { operation: String, message: String },

    #[error("Navigation failed: {message}")]
    Navigation { message: String },

    // Activation errors
    #[error("Unrecognized tile type: {value}")]
    UnrecognizedTileType { value: String },

    #[error("Malformed activation arguments: {message}")]
    MalformedActivation { message: String },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Validation errors
    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Viddy operations.
pub type Result<T> = std::result::Result<T, ViddyError>;

impl From<std::io::Error> for ViddyError {
    fn from(err: std::io::Error) -> Self {
        ViddyError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for ViddyError {
    fn from(err: serde_json::Error) -> Self {
        ViddyError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<rusqlite::Error> for ViddyError {
    fn from(err: rusqlite::Error) -> Self {
        ViddyError::Database {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl ViddyError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        ViddyError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create a shortcut collaborator error.
    pub fn shortcut(operation: impl Into<String>, message: impl Into<String>) -> Self {
        ViddyError::Shortcut {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Whether a launch may fall back to the main page instead of failing.
    ///
    /// Unrecognized tile types are data corruption and must never be
    /// downgraded.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ViddyError::MalformedActivation { .. }
                | ViddyError::Database { .. }
                | ViddyError::Json { .. }
                | ViddyError::Io { .. }
        )
    }
}
