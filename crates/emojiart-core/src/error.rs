//! Error types for the fallible edges of the editor core.
//!
//! Editing itself never fails: edits on missing emoji are no-ops and drops
//! report whether they were handled. Only loading configuration and
//! (de)serializing documents can go wrong.

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Document serialization errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Emoji id {0} is out of range")]
    IdOutOfRange(u64),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for document serialization.
pub type DocumentResult<T> = Result<T, DocumentError>;
