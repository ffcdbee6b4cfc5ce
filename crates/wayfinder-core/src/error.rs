//! Error types for the navigation service

use crate::remote::RemoteError;
use std::path::PathBuf;

/// Errors surfaced by the store and service
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// Remote read or write failed; the last good tree stays displayed
    #[error("failed to {operation}: {source}")]
    FetchFailure {
        operation: &'static str,
        #[source]
        source: RemoteError,
    },

    /// Remote refused the caller; never retried
    #[error("unauthorized: {0}")]
    UnauthorizedAction(String),

    /// Record does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Configuration could not be loaded or is invalid
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl NavError {
    /// Classify a remote failure for `operation`
    #[must_use]
    pub fn from_remote(operation: &'static str, error: RemoteError) -> Self {
        match error {
            RemoteError::Forbidden(reason) => Self::UnauthorizedAction(reason),
            RemoteError::NotFound(what) => Self::NotFound(what),
            source @ (RemoteError::Unavailable(_) | RemoteError::Decode(_)) => {
                Self::FetchFailure { operation, source }
            }
        }
    }

    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::FetchFailure {
                source: RemoteError::Unavailable(_),
                ..
            }
        )
    }

    /// Check if the remote refused the caller
    #[inline]
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::UnauthorizedAction(_))
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
