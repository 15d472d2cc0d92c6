//! Error types for I/O operations

use thiserror::Error;

/// Errors that can occur during I/O operations
#[derive(Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Core(#[from] sqfit_core::Error),

    #[error("Invalid file format: {format}")]
    InvalidFormat { format: String },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Entry {index} out of range ({count} entries)")]
    EntryOutOfRange { index: usize, count: usize },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    pub(crate) fn json<P: AsRef<std::path::Path>>(path: P, source: serde_json::Error) -> Self {
        IoError::Json {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

/// Result type alias for I/O operations
pub type Result<T> = std::result::Result<T, IoError>;
