//! Error snapshot surfaced to sync callers.
//!
//! Transport and storage errors are not `Clone`, but every caller that joined
//! an in-flight request must observe the same outcome. [`SyncError`] is the
//! flattened, cloneable form that gets fanned out.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Terminal failure of a `request`/`refresh` call.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum SyncError {
    /// The response was not a usable HTTP response.
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// Non-retriable (or exhausted) HTTP status.
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// Payload arrived but could not be decoded into the expected shape.
    #[error("Decode error: {detail}")]
    Decode { detail: String },

    /// Connection-level failure after retries.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Local store read or write failed.
    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl SyncError {
    /// Whether asking again later has a chance of succeeding.
    ///
    /// The UI uses this to decide between a retry affordance and a hard error.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            Self::InvalidResponse { .. } | Self::Decode { .. } | Self::Storage { .. } => false,
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
