//! Feature anchors

use crate::error::{DefinitionError, Result};
use crate::feature::Feature;
use crate::source::Source;
use serde::Serialize;
use std::collections::BTreeMap;

/// A named group of features computed from one source.
///
/// All features of an anchor share the anchor's key columns.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureAnchor {
    pub name: String,
    pub source: Source,
    pub features: Vec<Feature>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub registry_tags: BTreeMap<String, String>,
}

impl FeatureAnchor {
    pub fn new(name: impl Into<String>, source: impl Into<Source>, features: Vec<Feature>) -> Result<Self> {
        let anchor = Self {
            name: name.into(),
            source: source.into(),
            features,
            registry_tags: BTreeMap::new(),
        };
        anchor.validate()?;
        Ok(anchor)
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(DefinitionError::EmptyName { kind: "Anchor" });
        }

        let first = self.features.first().ok_or_else(|| DefinitionError::EmptyAnchor {
            anchor: self.name.clone(),
        })?;

        let expected = first.key_columns();
        for feature in &self.features[1..] {
            let actual = feature.key_columns();
            if actual != expected {
                return Err(DefinitionError::AnchorKeyMismatch {
                    anchor: self.name.clone(),
                    feature: feature.name.clone(),
                    expected: expected.iter().map(|s| s.to_string()).collect(),
                    actual: actual.iter().map(|s| s.to_string()).collect(),
                });
            }
        }

        log::debug!(
            "anchor '{}' binds {} feature(s) to source '{}'",
            self.name,
            self.features.len(),
            self.source.name()
        );
        Ok(())
    }

    pub fn with_registry_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.registry_tags.insert(key.into(), value.into());
        self
    }

    /// Key columns shared by every feature of the anchor
    pub fn key_columns(&self) -> Vec<&str> {
        self.features
            .first()
            .map(|f| f.key_columns())
            .unwrap_or_default()
    }

    /// Key aliases of the first feature, in key order
    pub fn key_aliases(&self) -> Vec<&str> {
        self.features
            .first()
            .map(|f| f.key.iter().map(|k| k.key_column_alias.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::HdfsSource;
    use crate::typed_key::TypedKey;
    use crate::types::{FeatureType, ValueType};

    fn batch_source() -> HdfsSource {
        HdfsSource::new("nycTaxiBatchSource", "/data/green_tripdata_2020-04.csv")
            .unwrap()
            .with_event_timestamp_column("lpep_dropoff_datetime")
    }

    #[test]
    fn test_anchor_on_input_context() {
        let features = vec![
            Feature::new("f_trip_distance", FeatureType::Float, "trip_distance").unwrap(),
            Feature::new("f_day_of_week", FeatureType::Int32, "dayofweek(lpep_dropoff_datetime)").unwrap(),
        ];
        let anchor = FeatureAnchor::new("request_features", Source::InputContext, features).unwrap();

        assert_eq!(anchor.source.name(), "PASSTHROUGH");
        assert_eq!(anchor.key_columns(), vec!["NOT_NEEDED"]);
        assert_eq!(anchor.feature_names(), vec!["f_trip_distance", "f_day_of_week"]);
    }

    #[test]
    fn test_empty_anchor_rejected() {
        let err = FeatureAnchor::new("empty", batch_source(), Vec::new()).unwrap_err();
        assert_eq!(
            err,
            DefinitionError::EmptyAnchor {
                anchor: "empty".to_string()
            }
        );
    }

    #[test]
    fn test_mixed_keys_rejected() {
        let location = TypedKey::new("DOLocationID", ValueType::Int32);
        let features = vec![
            Feature::new("f_location_fare", FeatureType::Float, "fare_amount")
                .unwrap()
                .keyed_by(location),
            Feature::new("f_trip_distance", FeatureType::Float, "trip_distance").unwrap(),
        ];

        let err = FeatureAnchor::new("mixed", batch_source(), features).unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::AnchorKeyMismatch { ref feature, .. } if feature == "f_trip_distance"
        ));
    }

    #[test]
    fn test_same_columns_different_aliases_allowed() {
        let key = TypedKey::new("DOLocationID", ValueType::Int32);
        let f1 = Feature::new("f_a", FeatureType::Float, "a").unwrap().keyed_by(key.clone());
        let f2 = Feature::new("f_b", FeatureType::Float, "b")
            .unwrap()
            .keyed_by(key.with_alias("dropoff"));

        let anchor = FeatureAnchor::new("location", batch_source(), vec![f1, f2]).unwrap();
        assert_eq!(anchor.key_aliases(), vec!["DOLocationID"]);
    }
}
