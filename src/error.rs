//! Error types for the recovery engine
//!
//! The scoring core is total and never returns these. They belong to the
//! boundary: parsing daily records, validating targets, loading config and
//! encoding reports.

use thiserror::Error;

use crate::record::ValidationError;

/// Errors that can occur at the engine boundary
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to parse daily record: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid daily record: {0}")]
    InvalidRecord(#[from] ValidationError),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
