//! Anchored features

use crate::error::{DefinitionError, Result};
use crate::transformation::Transformation;
use crate::typed_key::TypedKey;
use crate::types::FeatureType;
use serde::Serialize;
use std::collections::BTreeMap;

/// Behavior shared by anchored and derived features
pub trait FeatureBase {
    fn name(&self) -> &str;

    /// Name under which a derived feature refers to this feature
    fn feature_alias(&self) -> &str;

    fn feature_type(&self) -> FeatureType;

    fn key(&self) -> &[TypedKey];

    fn key_alias(&self) -> Vec<&str> {
        self.key()
            .iter()
            .map(|k| k.key_column_alias.as_str())
            .collect()
    }
}

/// A feature computed directly from the records of its anchor's source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    pub name: String,
    pub feature_type: FeatureType,
    /// Join keys; a single dummy key when the feature is not keyed
    pub key: Vec<TypedKey>,
    pub transform: Transformation,
    pub feature_alias: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub registry_tags: BTreeMap<String, String>,
}

impl Feature {
    /// Create an unkeyed feature
    pub fn new(
        name: impl Into<String>,
        feature_type: FeatureType,
        transform: impl Into<Transformation>,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(DefinitionError::EmptyName { kind: "Feature" });
        }

        Ok(Self {
            feature_alias: name.clone(),
            name,
            feature_type,
            key: vec![TypedKey::dummy()],
            transform: transform.into(),
            registry_tags: BTreeMap::new(),
        })
    }

    /// Key the feature by a single typed key
    pub fn keyed_by(mut self, key: TypedKey) -> Self {
        self.key = vec![key];
        self
    }

    /// Key the feature by several typed keys. An empty list keeps the current key.
    pub fn keyed_by_all(mut self, keys: Vec<TypedKey>) -> Self {
        if !keys.is_empty() {
            self.key = keys;
        }
        self
    }

    /// Copy of this feature whose keys are exposed under new aliases, in key order
    pub fn with_key_alias<S: AsRef<str>>(&self, aliases: &[S]) -> Result<Self> {
        if aliases.len() != self.key.len() {
            return Err(DefinitionError::KeyAliasCount {
                feature: self.name.clone(),
                expected: self.key.len(),
                actual: aliases.len(),
            });
        }

        let mut renamed = self.clone();
        for (key, alias) in renamed.key.iter_mut().zip(aliases) {
            key.key_column_alias = alias.as_ref().to_string();
        }
        Ok(renamed)
    }

    /// Copy of this feature referred to as `alias` by derived features
    pub fn as_feature(&self, alias: impl Into<String>) -> Self {
        let mut aliased = self.clone();
        aliased.feature_alias = alias.into();
        aliased
    }

    pub fn with_registry_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.registry_tags.insert(key.into(), value.into());
        self
    }

    /// Key columns, in key order
    pub fn key_columns(&self) -> Vec<&str> {
        self.key.iter().map(|k| k.key_column.as_str()).collect()
    }
}

impl FeatureBase for Feature {
    fn name(&self) -> &str {
        &self.name
    }

    fn feature_alias(&self) -> &str {
        &self.feature_alias
    }

    fn feature_type(&self) -> FeatureType {
        self.feature_type
    }

    fn key(&self) -> &[TypedKey] {
        &self.key
    }
}
