//! Error types for the docquery crate.

use thiserror::Error;

/// Errors raised while building descriptors, inferring mappings or loading
/// compiler options.
///
/// None of these are retryable: they describe a problem with the annotated
/// types or with configuration, and no partially built result is returned.
#[derive(Debug, Error)]
pub enum Error {
    /// A descriptor was requested for a type that is not a record.
    #[error("'{type_name}' is not a record type")]
    InvalidObjectType { type_name: String },

    /// An explicit mapping annotation named a type that does not exist.
    #[error("field '{field}': unknown mapping type '{name}'")]
    TypeUnknown { field: String, name: String },

    /// A `boost=` value that is not a positive integer.
    #[error("field '{field}': boost must be a positive integer, got '{value}'")]
    InvalidBoostParam { field: String, value: String },

    /// A query annotation without its positional role.
    #[error("field '{field}': query annotation does not specify a search type")]
    SearchTypeNotSpecified { field: String },

    /// A document search annotation with a role other than filter, must or should.
    #[error("field '{field}': unknown search role '{role}'")]
    UnknownRole { field: String, role: String },

    /// Compiler options could not be parsed.
    #[error("invalid compiler options: {message}")]
    Config { message: String },

    /// I/O error while reading options from disk.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding failed while rendering a request envelope.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config {
            message: err.to_string(),
        }
    }
}

/// Result type for docquery operations.
pub type Result<T> = std::result::Result<T, Error>;
