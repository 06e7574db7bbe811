//! Error types for FeatureForge definitions

use thiserror::Error;

/// Errors raised while constructing feature definitions.
///
/// Every variant is raised when the entity is built, never when it is
/// rendered: a value that exists is a value that can be compiled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// A required name was empty
    #[error("{kind} name cannot be empty")]
    EmptyName { kind: &'static str },

    /// A batch or streaming source took the passthrough sentinel's name
    #[error("Source name '{name}' is reserved for request-time features")]
    ReservedSourceName { name: String },

    /// JDBC auth mode outside USERPASS / TOKEN
    #[error("Invalid auth mode '{value}' for source '{source_name}': auth must be None or one of following values: ['userpass', 'token']")]
    InvalidAuth { source_name: String, value: String },

    /// JDBC source declared both a table and a query
    #[error("JDBC source '{source_name}' cannot declare both dbtable and query")]
    ConflictingJdbcAccess { source_name: String },

    /// Message schema is not valid JSON
    #[error("Invalid Avro schema: {0}")]
    InvalidSchema(String),

    /// Unknown window aggregation function
    #[error("Unknown aggregation function: {0}")]
    InvalidAggregation(String),

    /// Window length is not `<n><d|h|m|s>`
    #[error("Invalid window '{window}': {message}")]
    InvalidWindow { window: String, message: String },

    /// Derived features only accept row-level expressions
    #[error("Derived feature '{feature}' only supports expression transformations")]
    UnsupportedTransform { feature: String },

    /// Key alias rename does not line up with the declared keys
    #[error("Feature '{feature}' has {expected} key(s) but {actual} alias(es) were given")]
    KeyAliasCount {
        feature: String,
        expected: usize,
        actual: usize,
    },

    /// A derived feature key alias is not exposed by any input feature
    #[error("key alias {alias} in derived feature {feature} must come from its input features key alias list [{}]", .available.join(", "))]
    KeyAliasNotFound {
        alias: String,
        feature: String,
        available: Vec<String>,
    },

    /// A derived feature was declared without inputs
    #[error("Derived feature '{feature}' must have at least one input feature")]
    EmptyInputs { feature: String },

    /// An anchor was declared without features
    #[error("Anchor '{anchor}' must contain at least one feature")]
    EmptyAnchor { anchor: String },

    /// Features in one anchor disagree on their key columns
    #[error("Feature '{feature}' in anchor '{anchor}' is keyed by [{}] but the anchor is keyed by [{}]", .actual.join(", "), .expected.join(", "))]
    AnchorKeyMismatch {
        anchor: String,
        feature: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },
}

/// Result type for definition construction
pub type Result<T> = std::result::Result<T, DefinitionError>;
