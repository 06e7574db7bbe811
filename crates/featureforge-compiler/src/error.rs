//! Compiler error types

use featureforge_core::DefinitionError;
use thiserror::Error;

/// Compiler error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Entity failed its own validation
    #[error("Invalid definition: {0}")]
    Definition(#[from] DefinitionError),

    /// Two sources share a name but not a definition
    #[error("Source '{name}' is declared more than once with different definitions")]
    ConflictingSource { name: String },

    /// Derived feature input is not defined earlier in the document
    #[error("Derived feature '{derived}' references undefined input feature '{input}'")]
    UndefinedInput { derived: String, input: String },

    /// Two derived inputs are exposed under the same alias
    #[error("Derived feature '{derived}' has more than one input aliased '{alias}'")]
    DuplicateInputAlias { derived: String, alias: String },

    /// Feature name defined more than once
    #[error("Duplicate feature name: {0}")]
    DuplicateFeature(String),

    /// Anchor name defined more than once
    #[error("Duplicate anchor name: {0}")]
    DuplicateAnchor(String),
}

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;
