//! Serialization error types.

use crate::section::PathError;
use thiserror::Error;

/// Errors a type's `from_map` may raise while rebuilding an instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeserializationError {
    /// A required key was not present
    #[error("missing field '{0}'")]
    MissingField(String),

    /// A key was present but held the wrong shape
    #[error("invalid field '{field}': expected {expected}")]
    InvalidField { field: String, expected: String },

    /// Free-form rejection
    #[error("{0}")]
    Custom(String),

    /// A path inside the payload was malformed
    #[error(transparent)]
    Path(#[from] PathError),
}

impl DeserializationError {
    pub fn missing_field<F: Into<String>>(field: F) -> Self {
        Self::MissingField(field.into())
    }

    pub fn invalid_field<F: Into<String>, E: Into<String>>(field: F, expected: E) -> Self {
        Self::InvalidField {
            field: field.into(),
            expected: expected.into(),
        }
    }

    pub fn custom<M: Into<String>>(message: M) -> Self {
        Self::Custom(message.into())
    }
}

/// Errors raised by a [`SerializationRegistry`](super::SerializationRegistry).
#[derive(Debug, Error)]
pub enum SerializationError {
    /// No descriptor resolved for the identifier
    #[error("Unknown serializable type: {0}")]
    UnknownType(String),

    /// The Rust type being serialized has no descriptor
    #[error("Type '{type_name}' is not registered in registry '{registry}'")]
    NotRegistered { type_name: String, registry: String },

    /// A different type already uses this canonical name
    #[error("Canonical name '{0}' is already registered by another type")]
    DuplicateType(String),

    /// The section has no marker key, or its value is not a string
    #[error("Section is not tagged with marker '{0}'")]
    NotTagged(String),

    /// The section resolved to a different type than requested
    #[error("Section holds '{found}' but '{expected}' was requested")]
    TypeMismatch { expected: String, found: String },

    /// The descriptor rejected the payload
    #[error("Failed to deserialize '{type_name}': {source}")]
    Deserialization {
        type_name: String,
        #[source]
        source: DeserializationError,
    },

    /// Malformed path
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Result type for registry operations.
pub type SerializationResult<T> = Result<T, SerializationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SerializationError::UnknownType("==com.example.Missing".into());
        assert_eq!(
            err.to_string(),
            "Unknown serializable type: ==com.example.Missing"
        );

        let err = SerializationError::Deserialization {
            type_name: "point".into(),
            source: DeserializationError::missing_field("x"),
        };
        assert_eq!(err.to_string(), "Failed to deserialize 'point': missing field 'x'");

        let err = DeserializationError::invalid_field("port", "an integer");
        assert_eq!(err.to_string(), "invalid field 'port': expected an integer");
    }
}
