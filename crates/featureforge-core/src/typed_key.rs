//! Typed join keys

use crate::types::ValueType;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Key column used by features that are not explicitly keyed
pub const DUMMY_KEY_COLUMN: &str = "NOT_NEEDED";

/// Shared key for passthrough/request features.
///
/// Initialized once and never mutated; constructors take a clone of it.
pub static DUMMY_KEY: LazyLock<TypedKey> = LazyLock::new(|| {
    TypedKey::new(DUMMY_KEY_COLUMN, ValueType::Unspecified)
        .with_full_name("featureforge.dummy_typedkey")
        .with_description("A dummy typed key for passthrough/request feature.")
});

/// A join key: column plus value type.
///
/// The alias is the name the key is exposed under to derived features; it
/// defaults to the key column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypedKey {
    /// Key column (or key expression) in the source data
    pub key_column: String,

    /// Value type of the key column
    pub key_column_type: ValueType,

    /// Fully qualified name in the catalog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Alias exposed to consumers
    pub key_column_alias: String,
}

impl TypedKey {
    /// Create a key whose alias equals its column
    pub fn new(key_column: impl Into<String>, key_column_type: ValueType) -> Self {
        let key_column = key_column.into();
        Self {
            key_column_alias: key_column.clone(),
            key_column,
            key_column_type,
            full_name: None,
            description: None,
        }
    }

    /// The implicit key of unkeyed features
    pub fn dummy() -> Self {
        DUMMY_KEY.clone()
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Expose this key under a different alias
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.key_column_alias = alias.into();
        self
    }

    pub fn is_dummy(&self) -> bool {
        self.key_column == DUMMY_KEY_COLUMN
    }
}
