//! Core error types for healthykong-core.
//!
//! This module defines the error hierarchy using thiserror. The three-way
//! split the engine's callers rely on is: `NotFound` (setup/integrity
//! problem, not retryable), transient store conditions (caller may retry
//! the whole logical operation), and validation failures (rejected before
//! any store interaction).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for healthykong-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Record-store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// AI insights errors
    #[error("Insights error: {0}")]
    Insights(#[from] InsightsError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Record-store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Referenced user summary does not exist. Indicates an
    /// account-provisioning defect, not a retryable condition.
    #[error("No summary record for user '{0}'")]
    NotFound(String),

    /// The store is busy or a write conflicted. The whole logical
    /// operation is safe to retry.
    #[error("Store temporarily unavailable")]
    Transient,

    /// Failed to open the store
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Store migration failed: {0}")]
    MigrationFailed(String),

    /// A persisted row could not be decoded
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Whether the caller may retry the whole logical operation.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient)
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Input validation errors. Raised before any store interaction.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A numeric reading that must be positive was not
    #[error("Invalid value for '{field}': {message}")]
    InvalidReading { field: String, message: String },

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Free-text field empty or over limit
    #[error("Invalid text for '{field}': {message}")]
    InvalidText { field: String, message: String },
}

/// AI insights client errors.
#[derive(Error, Debug)]
pub enum InsightsError {
    /// No API key stored for the insights endpoint
    #[error("No API key configured for the insights service")]
    MissingApiKey,

    /// The endpoint rejected the request
    #[error("Insights endpoint returned HTTP {status}")]
    HttpStatus { status: u16 },

    /// The response body did not contain a completion
    #[error("Malformed insights response: {0}")]
    MalformedResponse(String),

    /// Transport failure
    #[error("Insights request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StoreError::Transient
                } else {
                    StoreError::QueryFailed(e.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_maps_to_transient() {
        let sqlite_err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        let err: StoreError = sqlite_err.into();
        assert!(err.is_transient());
    }

    #[test]
    fn not_found_is_not_transient() {
        assert!(!StoreError::NotFound("u1".into()).is_transient());
    }
}
