//! Derived features
//!
//! A derived feature is computed from other features instead of from a
//! source. Its key aliases must be drawn from the key aliases its inputs
//! expose; this is checked when the derived feature is built.

use crate::error::{DefinitionError, Result};
use crate::feature::{Feature, FeatureBase};
use crate::transformation::Transformation;
use crate::typed_key::TypedKey;
use crate::types::FeatureType;
use serde::Serialize;
use std::collections::BTreeMap;

/// An input of a derived feature: anchored or itself derived
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InputFeature {
    Anchored(Feature),
    Derived(DerivedFeature),
}

impl FeatureBase for InputFeature {
    fn name(&self) -> &str {
        match self {
            InputFeature::Anchored(f) => f.name(),
            InputFeature::Derived(f) => f.name(),
        }
    }

    fn feature_alias(&self) -> &str {
        match self {
            InputFeature::Anchored(f) => f.feature_alias(),
            InputFeature::Derived(f) => f.feature_alias(),
        }
    }

    fn feature_type(&self) -> FeatureType {
        match self {
            InputFeature::Anchored(f) => f.feature_type(),
            InputFeature::Derived(f) => f.feature_type(),
        }
    }

    fn key(&self) -> &[TypedKey] {
        match self {
            InputFeature::Anchored(f) => f.key(),
            InputFeature::Derived(f) => f.key(),
        }
    }
}

impl From<Feature> for InputFeature {
    fn from(f: Feature) -> Self {
        InputFeature::Anchored(f)
    }
}

impl From<DerivedFeature> for InputFeature {
    fn from(f: DerivedFeature) -> Self {
        InputFeature::Derived(f)
    }
}

/// One or many input features, normalized to an ordered list
#[derive(Debug, Clone, Default)]
pub struct InputFeatures(Vec<InputFeature>);

impl InputFeatures {
    pub fn into_vec(self) -> Vec<InputFeature> {
        self.0
    }
}

impl From<Feature> for InputFeatures {
    fn from(f: Feature) -> Self {
        Self(vec![f.into()])
    }
}

impl From<DerivedFeature> for InputFeatures {
    fn from(f: DerivedFeature) -> Self {
        Self(vec![f.into()])
    }
}

impl From<InputFeature> for InputFeatures {
    fn from(f: InputFeature) -> Self {
        Self(vec![f])
    }
}

impl<T: Into<InputFeature>> From<Vec<T>> for InputFeatures {
    fn from(features: Vec<T>) -> Self {
        Self(features.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<InputFeature>, const N: usize> From<[T; N]> for InputFeatures {
    fn from(features: [T; N]) -> Self {
        Self(features.into_iter().map(Into::into).collect())
    }
}

/// A feature defined on top of other features
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedFeature {
    pub name: String,
    pub feature_type: FeatureType,
    pub key: Vec<TypedKey>,
    /// Inputs in caller order; never reordered
    pub input_features: Vec<InputFeature>,
    pub transform: Transformation,
    pub feature_alias: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub registry_tags: BTreeMap<String, String>,
}

impl DerivedFeature {
    /// Build an unkeyed derived feature
    pub fn new(
        name: impl Into<String>,
        feature_type: FeatureType,
        input_features: impl Into<InputFeatures>,
        transform: impl Into<Transformation>,
    ) -> Result<Self> {
        Self::builder(name, feature_type)
            .inputs(input_features)
            .transform(transform)
            .build()
    }

    pub fn builder(name: impl Into<String>, feature_type: FeatureType) -> DerivedFeatureBuilder {
        DerivedFeatureBuilder::new(name, feature_type)
    }

    /// Copy referred to as `alias` by other derived features
    pub fn as_feature(&self, alias: impl Into<String>) -> Self {
        let mut aliased = self.clone();
        aliased.feature_alias = alias.into();
        aliased
    }

    /// Union of the key aliases exposed by the inputs, in input order
    pub fn input_key_aliases(&self) -> Vec<&str> {
        self.input_features
            .iter()
            .flat_map(|f| f.key().iter().map(|k| k.key_column_alias.as_str()))
            .collect()
    }

    fn validate(&self) -> Result<()> {
        if self.input_features.is_empty() {
            return Err(DefinitionError::EmptyInputs {
                feature: self.name.clone(),
            });
        }

        if self.transform.is_window_agg() {
            return Err(DefinitionError::UnsupportedTransform {
                feature: self.name.clone(),
            });
        }

        let available = self.input_key_aliases();
        for alias in self.key_alias() {
            if !available.contains(&alias) {
                return Err(DefinitionError::KeyAliasNotFound {
                    alias: alias.to_string(),
                    feature: self.name.clone(),
                    available: available.iter().map(|s| s.to_string()).collect(),
                });
            }
        }

        log::debug!(
            "derived feature '{}' validated against {} input(s)",
            self.name,
            self.input_features.len()
        );
        Ok(())
    }
}

impl FeatureBase for DerivedFeature {
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

/// Builder for [`DerivedFeature`]; validation runs in [`build`](Self::build)
#[derive(Debug, Clone)]
pub struct DerivedFeatureBuilder {
    name: String,
    feature_type: FeatureType,
    key: Vec<TypedKey>,
    input_features: Vec<InputFeature>,
    transform: Option<Transformation>,
    registry_tags: BTreeMap<String, String>,
}

impl DerivedFeatureBuilder {
    pub fn new(name: impl Into<String>, feature_type: FeatureType) -> Self {
        Self {
            name: name.into(),
            feature_type,
            key: Vec::new(),
            input_features: Vec::new(),
            transform: None,
            registry_tags: BTreeMap::new(),
        }
    }

    /// Add a key; unkeyed derived features use the dummy key
    pub fn key(mut self, key: TypedKey) -> Self {
        self.key.push(key);
        self
    }

    pub fn keys(mut self, keys: Vec<TypedKey>) -> Self {
        self.key.extend(keys);
        self
    }

    pub fn input(mut self, feature: impl Into<InputFeature>) -> Self {
        self.input_features.push(feature.into());
        self
    }

    pub fn inputs(mut self, features: impl Into<InputFeatures>) -> Self {
        self.input_features.extend(features.into().into_vec());
        self
    }

    pub fn transform(mut self, transform: impl Into<Transformation>) -> Self {
        self.transform = Some(transform.into());
        self
    }

    pub fn registry_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.registry_tags.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Result<DerivedFeature> {
        if self.name.is_empty() {
            return Err(DefinitionError::EmptyName {
                kind: "Derived feature",
            });
        }

        let key = if self.key.is_empty() {
            vec![TypedKey::dummy()]
        } else {
            self.key
        };

        // A missing transform passes the single input through
        let transform = match self.transform {
            Some(t) => t,
            None => Transformation::expression(
                self.input_features
                    .first()
                    .map(|f| f.feature_alias().to_string())
                    .unwrap_or_default(),
            ),
        };

        let derived = DerivedFeature {
            feature_alias: self.name.clone(),
            name: self.name,
            feature_type: self.feature_type,
            key,
            input_features: self.input_features,
            transform,
            registry_tags: self.registry_tags,
        };
        derived.validate()?;
        Ok(derived)
    }
}
