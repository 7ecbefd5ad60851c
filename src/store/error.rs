//! Store and codec error types.

use crate::section::PathError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a text codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The document could not be parsed
    #[error("Failed to parse {format} document: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    /// The tree could not be rendered
    #[error("Failed to render {format} document: {message}")]
    Render {
        format: &'static str,
        message: String,
    },

    /// The document root was a scalar or a list
    #[error("{format} document root must be a mapping, found {found}")]
    NotAMapping {
        format: &'static str,
        found: &'static str,
    },
}

impl CodecError {
    pub fn parse(format: &'static str, message: impl ToString) -> Self {
        Self::Parse {
            format,
            message: message.to_string(),
        }
    }

    pub fn render(format: &'static str, message: impl ToString) -> Self {
        Self::Render {
            format,
            message: message.to_string(),
        }
    }
}

/// Errors that can occur while loading or saving a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Config file not found at expected path
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read config file
    #[error("Failed to read configuration file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write config file
    #[error("Failed to write configuration file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read from or write to a stream
    #[error("Stream I/O failed: {0}")]
    Stream(#[from] std::io::Error),

    /// The codec rejected the document or tree
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Malformed path
    #[error(transparent)]
    Path(#[from] PathError),

    /// The store has no file to save to or reload from
    #[error("Store has no backing file path")]
    MissingPath,
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
