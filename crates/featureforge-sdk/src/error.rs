//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Parser error
    #[error("Parser error: {0}")]
    ParseError(#[from] featureforge_parser::ParseError),

    /// Compiler error
    #[error("Compiler error: {0}")]
    CompileError(#[from] featureforge_compiler::CompileError),

    /// Definition error
    #[error("Definition error: {0}")]
    Definition(#[from] featureforge_core::DefinitionError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Secrets required by the sources could not be resolved
    #[error("Missing required properties: {}", .0.join(", "))]
    MissingSecrets(Vec<String>),

    /// No features have been built yet
    #[error("Features not built")]
    NotBuilt,
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
