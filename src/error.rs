//! Error types shared across the crate.

use thiserror::Error;

/// Why an edit to a result cell was refused. The record is left untouched.
#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("Invalid value for {field}: {raw:?}")]
    InvalidValue { field: &'static str, raw: String },

    #[error("Unknown timeframe: {0}")]
    UnknownTimeframe(String),

    #[error("Unknown area: {0}")]
    UnknownArea(String),
}

/// Failures of the indicator table.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage rejected the request: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}
