//! Parser error types

use featureforge_core::DefinitionError;
use thiserror::Error;

/// Parser error
#[derive(Error, Debug)]
pub enum ParseError {
    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Invalid field value
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Anchor refers to a source that is not declared
    #[error("Unknown source: {0}")]
    UnknownSource(String),

    /// Source name declared twice
    #[error("Duplicate source name: {0}")]
    DuplicateSource(String),

    /// Derived feature input not declared before it
    #[error("Unknown input feature '{input}' in derived feature '{derived}'")]
    UnknownFeature { derived: String, input: String },

    /// The declared entity failed its own validation
    #[error("Invalid definition: {0}")]
    Definition(#[from] DefinitionError),
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
