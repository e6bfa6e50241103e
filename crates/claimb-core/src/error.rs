//! Unified error types for Claimb Core.

use claimb_client::ClientError;
use claimb_types::SyncError;
use thiserror::Error;

/// Main error type for all core operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// Remote fetch failed (after the client's own retries).
    #[error("Remote error: {0}")]
    Client(#[from] ClientError),

    /// Database operation failed (SQLite).
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation failed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local store misbehaved outside of SQLite (poisoned task, missing record).
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type alias for core operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Storage(format!("background task failed: {}", err))
    }
}

impl From<&AppError> for SyncError {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::Client(client) => client.into(),
            AppError::Config(message) => SyncError::InvalidResponse { message: message.clone() },
            AppError::Database(_) | AppError::Io(_) | AppError::Json(_) | AppError::Storage(_) => {
                SyncError::Storage { message: err.to_string() }
            },
        }
    }
}

impl From<AppError> for SyncError {
    fn from(err: AppError) -> Self {
        (&err).into()
    }
}
