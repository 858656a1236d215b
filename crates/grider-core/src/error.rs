//! Error types for Grider core.

use thiserror::Error;

/// Errors that can occur while editing, loading or saving a document.
///
/// Formula problems are not errors at this level: they are displayed in the
/// cell as `#REF`, `#ERR` and so on.
#[derive(Error, Debug)]
pub enum GriderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Document format error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid cell key in document: {0:?}")]
    InvalidKey(String),

    #[error("Invalid cell reference: {0}")]
    InvalidCellRef(String),

    #[error("No file path set")]
    NoFilePath,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command}: {message}")]
    InvalidArgument { command: String, message: String },
}

pub type Result<T> = std::result::Result<T, GriderError>;
