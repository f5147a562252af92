//! Errors raised while parsing or loading patient records

use std::path::PathBuf;
use thiserror::Error;

/// Result type for record operations
pub type RecordResult<T> = Result<T, RecordError>;

/// Errors that can occur while building a `PatientRecord` from external data
#[derive(Debug, Error)]
pub enum RecordError {
    /// Input is not valid JSON
    #[error("Invalid JSON format: {message}")]
    InvalidJson { message: String },

    /// Top-level JSON value is not an object
    #[error("Patient record must be a JSON object, found {found}")]
    NotAnObject { found: String },

    /// One or more required fields are absent
    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },

    /// A field is present but has the wrong shape
    #[error("Invalid value for field '{field}': {message}")]
    InvalidField { field: String, message: String },

    /// Date of birth is not a valid ISO calendar date
    #[error("Invalid date of birth '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// File system failure
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RecordError {
    /// Create an invalid JSON error
    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self::InvalidJson {
            message: message.into(),
        }
    }

    /// Create an invalid field error
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error bound to a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
