//! Path error types for the section module.

use thiserror::Error;

/// Errors raised when a dotted path cannot be split into segments.
///
/// A malformed path is a programming error rather than a document error, so
/// unlike shape mismatches it is always propagated to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path string was empty
    #[error("Malformed path: path is empty")]
    Empty,

    /// One of the dot-separated segments was empty
    #[error("Malformed path '{path}': segment {index} is empty")]
    EmptySegment { path: String, index: usize },
}

impl PathError {
    /// Create an empty-segment error
    pub fn empty_segment<P: Into<String>>(path: P, index: usize) -> Self {
        Self::EmptySegment {
            path: path.into(),
            index,
        }
    }
}

/// Result type for path-addressed operations.
pub type PathResult<T> = Result<T, PathError>;
