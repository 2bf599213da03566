use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the metadata server
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Why a single metadata file was left out of a result.
///
/// None of these reach the client; they only feed the per-scan summary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("file could not be read")]
    Unreadable,

    #[error("body is not valid JSON")]
    Malformed,

    #[error("body is not a non-empty JSON object")]
    NotAnObject,

    #[error("required field `{0}` is missing or falsy")]
    Missing(&'static str),

    #[error("required field `{0}` has an unsupported type")]
    WrongType(&'static str),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, IndexError>;
