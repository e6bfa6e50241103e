//! Tagged sync outcome.

use crate::error::SyncError;
use serde::{Deserialize, Serialize};

/// Result of a coordinated fetch, handed to the UI layer as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum SyncResult<T> {
    Loaded(T),
    Error(SyncError),
}

impl<T> SyncResult<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&SyncError> {
        match self {
            Self::Loaded(_) => None,
            Self::Error(err) => Some(err),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SyncResult<U> {
        match self {
            Self::Loaded(value) => SyncResult::Loaded(f(value)),
            Self::Error(err) => SyncResult::Error(err),
        }
    }

    pub fn into_result(self) -> Result<T, SyncError> {
        self.into()
    }
}

impl<T> From<Result<T, SyncError>> for SyncResult<T> {
    fn from(result: Result<T, SyncError>) -> Self {
        match result {
            Ok(value) => Self::Loaded(value),
            Err(err) => Self::Error(err),
        }
    }
}

impl<T> From<SyncResult<T>> for Result<T, SyncError> {
    fn from(result: SyncResult<T>) -> Self {
        match result {
            SyncResult::Loaded(value) => Ok(value),
            SyncResult::Error(err) => Err(err),
        }
    }
}
