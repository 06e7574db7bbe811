//! Definition parser
//!
//! Parses a YAML definition document into anchors and derived features.
//! Sources are referenced by name from anchors; derived inputs are
//! referenced by feature name and must be declared before use.

use crate::document::{
    RawAnchor, RawDerivedFeature, RawDocument, RawFeature, RawInput, RawSource, RawTypedKey,
    RawWindowAgg,
};
use crate::error::{ParseError, Result};
use featureforge_core::{
    AvroJsonSchema, DerivedFeature, Feature, FeatureAnchor, FeatureBase, FeatureType, HdfsSource,
    InputFeature, JdbcSource, KafkaConfig, KafkaSource, Preprocessing, Source, SourceSchema,
    Transformation, TypedKey, ValueType, WindowAggTransformation, INPUT_CONTEXT_NAME,
};
use std::collections::HashMap;

/// Anchors and derived features built from one document
#[derive(Debug, Clone, Default)]
pub struct FeatureDefinitions {
    pub anchors: Vec<FeatureAnchor>,
    pub derived_features: Vec<DerivedFeature>,
}

impl FeatureDefinitions {
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty() && self.derived_features.is_empty()
    }
}

/// Definition parser
pub struct DefinitionParser;

impl DefinitionParser {
    /// Parse definitions from a YAML string
    pub fn parse(yaml_str: &str) -> Result<FeatureDefinitions> {
        let raw: RawDocument = serde_yaml::from_str(yaml_str)?;
        Self::parse_document(raw)
    }

    /// Build definitions from an already deserialized document
    pub fn parse_document(raw: RawDocument) -> Result<FeatureDefinitions> {
        let mut sources: HashMap<String, Source> = HashMap::new();
        for raw_source in raw.sources {
            let name = raw_source.name().to_string();
            if name == INPUT_CONTEXT_NAME || sources.contains_key(&name) {
                return Err(ParseError::DuplicateSource(name));
            }
            let source = Self::parse_source(raw_source)?;
            sources.insert(name, source);
        }

        // Every feature declared so far, by name
        let mut declared: HashMap<String, InputFeature> = HashMap::new();

        let mut anchors = Vec::with_capacity(raw.anchors.len());
        for raw_anchor in raw.anchors {
            let anchor = Self::parse_anchor(raw_anchor, &sources)?;
            for feature in &anchor.features {
                declared.insert(feature.name.clone(), feature.clone().into());
            }
            anchors.push(anchor);
        }

        let mut derived_features = Vec::with_capacity(raw.derived_features.len());
        for raw_derived in raw.derived_features {
            let derived = Self::parse_derived(raw_derived, &declared)?;
            declared.insert(derived.name.clone(), derived.clone().into());
            derived_features.push(derived);
        }

        log::debug!(
            "Parsed {} source(s), {} anchor(s), {} derived feature(s)",
            sources.len(),
            anchors.len(),
            derived_features.len()
        );

        Ok(FeatureDefinitions {
            anchors,
            derived_features,
        })
    }

    fn parse_source(raw: RawSource) -> Result<Source> {
        let source = match raw {
            RawSource::Hdfs {
                name,
                path,
                preprocessing,
                event_timestamp_column,
                timestamp_format,
                registry_tags,
            } => {
                let mut source = HdfsSource::new(name, path)?;
                if let Some(preprocessing) = preprocessing {
                    source = source.with_preprocessing(Preprocessing::new(preprocessing));
                }
                if let Some(column) = event_timestamp_column {
                    source = source.with_event_timestamp_column(column);
                }
                if let Some(format) = timestamp_format {
                    source = source.with_timestamp_format(format);
                }
                for (key, value) in registry_tags {
                    source = source.with_registry_tag(key, value);
                }
                Source::Hdfs(source)
            }
            RawSource::Jdbc {
                name,
                url,
                dbtable,
                query,
                auth,
                preprocessing,
                event_timestamp_column,
                timestamp_format,
                registry_tags,
            } => {
                let mut builder = JdbcSource::builder(name, url);
                if let Some(dbtable) = dbtable {
                    builder = builder.dbtable(dbtable);
                }
                if let Some(query) = query {
                    builder = builder.query(query);
                }
                if let Some(auth) = auth {
                    builder = builder.auth(auth);
                }
                if let Some(preprocessing) = preprocessing {
                    builder = builder.preprocessing(Preprocessing::new(preprocessing));
                }
                if let Some(column) = event_timestamp_column {
                    builder = builder.event_timestamp_column(column);
                }
                if let Some(format) = timestamp_format {
                    builder = builder.timestamp_format(format);
                }
                for (key, value) in registry_tags {
                    builder = builder.registry_tag(key, value);
                }
                Source::Jdbc(builder.build()?)
            }
            RawSource::Kafka {
                name,
                brokers,
                topics,
                avro_schema,
                registry_tags,
            } => {
                let schema_str = match avro_schema {
                    serde_yaml::Value::String(s) => s,
                    other => serde_json::to_string(&other).map_err(|e| ParseError::InvalidValue {
                        field: format!("sources.{}.avro_schema", name),
                        message: e.to_string(),
                    })?,
                };
                let schema = SourceSchema::AvroJson(AvroJsonSchema::new(schema_str)?);
                let mut source = KafkaSource::new(name, KafkaConfig::new(brokers, topics, schema))?;
                for (key, value) in registry_tags {
                    source = source.with_registry_tag(key, value);
                }
                Source::Kafka(source)
            }
        };

        Ok(source)
    }

    fn parse_anchor(raw: RawAnchor, sources: &HashMap<String, Source>) -> Result<FeatureAnchor> {
        let source = if raw.source == INPUT_CONTEXT_NAME {
            Source::InputContext
        } else {
            sources
                .get(&raw.source)
                .cloned()
                .ok_or_else(|| ParseError::UnknownSource(raw.source.clone()))?
        };

        let features = raw
            .features
            .into_iter()
            .map(Self::parse_feature)
            .collect::<Result<Vec<_>>>()?;

        let mut anchor = FeatureAnchor::new(raw.name, source, features)?;
        for (key, value) in raw.registry_tags {
            anchor = anchor.with_registry_tag(key, value);
        }
        Ok(anchor)
    }

    fn parse_feature(raw: RawFeature) -> Result<Feature> {
        let field = format!("features.{}", raw.name);
        let feature_type = Self::parse_feature_type(&raw.feature_type, &field)?;

        let transform: Transformation = match (raw.transform, raw.window_agg) {
            (Some(expr), None) => expr.into(),
            (None, Some(agg)) => Self::parse_window_agg(agg)?.into(),
            (Some(_), Some(_)) => {
                return Err(ParseError::InvalidValue {
                    field,
                    message: "transform and window_agg are mutually exclusive".to_string(),
                })
            }
            (None, None) => {
                return Err(ParseError::MissingField {
                    field: format!("{}.transform", field),
                })
            }
        };

        let keys = Self::parse_keys(raw.key, &field)?;
        let mut feature = Feature::new(raw.name, feature_type, transform)?.keyed_by_all(keys);
        for (key, value) in raw.registry_tags {
            feature = feature.with_registry_tag(key, value);
        }
        Ok(feature)
    }

    fn parse_window_agg(raw: RawWindowAgg) -> Result<WindowAggTransformation> {
        let mut agg = WindowAggTransformation::new(raw.expr, &raw.func, raw.window)?;
        if let Some(group_by) = raw.group_by {
            agg = agg.with_group_by(group_by);
        }
        if let Some(filter) = raw.filter {
            agg = agg.with_filter(filter);
        }
        if let Some(limit) = raw.limit {
            agg = agg.with_limit(limit);
        }
        Ok(agg)
    }

    fn parse_derived(
        raw: RawDerivedFeature,
        declared: &HashMap<String, InputFeature>,
    ) -> Result<DerivedFeature> {
        let field = format!("derived_features.{}", raw.name);
        let feature_type = Self::parse_feature_type(&raw.feature_type, &field)?;

        let mut builder = DerivedFeature::builder(raw.name.clone(), feature_type)
            .keys(Self::parse_keys(raw.key, &field)?);

        for input in &raw.inputs {
            builder = builder.input(Self::resolve_input(&raw.name, input, declared)?);
        }
        if let Some(transform) = raw.transform {
            builder = builder.transform(transform);
        }
        for (key, value) in raw.registry_tags {
            builder = builder.registry_tag(key, value);
        }

        Ok(builder.build()?)
    }

    fn resolve_input(
        derived: &str,
        input: &RawInput,
        declared: &HashMap<String, InputFeature>,
    ) -> Result<InputFeature> {
        let found = declared
            .get(input.feature_name())
            .ok_or_else(|| ParseError::UnknownFeature {
                derived: derived.to_string(),
                input: input.feature_name().to_string(),
            })?;

        let RawInput::Aliased {
            alias, key_alias, ..
        } = input
        else {
            return Ok(found.clone());
        };

        let resolved = match (found, key_alias) {
            (InputFeature::Anchored(feature), Some(key_alias)) => {
                InputFeature::Anchored(feature.with_key_alias(key_alias.as_slice())?)
            }
            (InputFeature::Derived(_), Some(_)) => {
                return Err(ParseError::InvalidValue {
                    field: format!("derived_features.{}.inputs.{}", derived, found.name()),
                    message: "key_alias is only supported on anchored features".to_string(),
                })
            }
            (_, None) => found.clone(),
        };

        Ok(match (resolved, alias) {
            (InputFeature::Anchored(f), Some(alias)) => InputFeature::Anchored(f.as_feature(alias)),
            (InputFeature::Derived(f), Some(alias)) => InputFeature::Derived(f.as_feature(alias)),
            (resolved, None) => resolved,
        })
    }

    fn parse_keys(raw: Vec<RawTypedKey>, field: &str) -> Result<Vec<TypedKey>> {
        raw.into_iter()
            .map(|key| -> Result<TypedKey> {
                let value_type: ValueType =
                    key.value_type
                        .parse()
                        .map_err(|message| ParseError::InvalidValue {
                            field: format!("{}.key.{}", field, key.column),
                            message,
                        })?;

                let mut typed_key = TypedKey::new(key.column, value_type);
                if let Some(full_name) = key.full_name {
                    typed_key = typed_key.with_full_name(full_name);
                }
                if let Some(description) = key.description {
                    typed_key = typed_key.with_description(description);
                }
                if let Some(alias) = key.alias {
                    typed_key = typed_key.with_alias(alias);
                }
                Ok(typed_key)
            })
            .collect()
    }

    fn parse_feature_type(value: &str, field: &str) -> Result<FeatureType> {
        value.parse().map_err(|message| ParseError::InvalidValue {
            field: format!("{}.type", field),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use featureforge_core::DefinitionError;

    #[test]
    fn test_parse_empty_document() {
        let defs = DefinitionParser::parse("{}").unwrap();
        assert!(defs.is_empty());
    }

    #[test]
    fn test_parse_passthrough_anchor() {
        let yaml = r#"
anchors:
  - name: request_features
    source: PASSTHROUGH
    features:
      - name: f_trip_distance
        type: FLOAT
        transform: trip_distance
"#;
        let defs = DefinitionParser::parse(yaml).unwrap();
        assert_eq!(defs.anchors.len(), 1);
        assert!(defs.anchors[0].source.is_input_context());
        assert_eq!(defs.anchors[0].feature_names(), vec!["f_trip_distance"]);
        assert_eq!(defs.anchors[0].key_columns(), vec!["NOT_NEEDED"]);
    }

    #[test]
    fn test_unknown_source() {
        let yaml = r#"
anchors:
  - name: a
    source: missing
    features:
      - name: f
        type: FLOAT
        transform: x
"#;
        let err = DefinitionParser::parse(yaml).unwrap_err();
        assert!(matches!(err, ParseError::UnknownSource(ref s) if s == "missing"));
    }

    #[test]
    fn test_duplicate_source_name() {
        let yaml = r#"
sources:
  - name: trips
    type: hdfs
    path: /a
  - name: trips
    type: hdfs
    path: /b
"#;
        let err = DefinitionParser::parse(yaml).unwrap_err();
        assert!(matches!(err, ParseError::DuplicateSource(ref s) if s == "trips"));
    }

    #[test]
    fn test_misspelled_source_field_rejected() {
        let yaml = r#"
sources:
  - name: trips
    type: hdfs
    path: /data
    event_timestamp_colum: lpep_dropoff_datetime
"#;
        let err = DefinitionParser::parse(yaml).unwrap_err();
        assert!(matches!(err, ParseError::YamlError(_)));
        assert!(err.to_string().contains("event_timestamp_colum"));
    }

    #[test]
    fn test_invalid_jdbc_auth_surfaces_definition_error() {
        let yaml = r#"
sources:
  - name: sql
    type: jdbc
    url: jdbc:sqlserver://host
    dbtable: t
    auth: usercreds
"#;
        let err = DefinitionParser::parse(yaml).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Definition(DefinitionError::InvalidAuth { .. })
        ));
    }

    #[test]
    fn test_transform_and_window_agg_exclusive() {
        let yaml = r#"
anchors:
  - name: a
    source: PASSTHROUGH
    features:
      - name: f
        type: FLOAT
        transform: x
        window_agg:
          expr: x
          func: AVG
          window: 1d
"#;
        let err = DefinitionParser::parse(yaml).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { .. }));
    }

    #[test]
    fn test_missing_transform() {
        let yaml = r#"
anchors:
  - name: a
    source: PASSTHROUGH
    features:
      - name: f
        type: FLOAT
"#;
        let err = DefinitionParser::parse(yaml).unwrap_err();
        assert!(matches!(err, ParseError::MissingField { ref field } if field == "features.f.transform"));
    }

    #[test]
    fn test_unknown_feature_type() {
        let yaml = r#"
anchors:
  - name: a
    source: PASSTHROUGH
    features:
      - name: f
        type: DECIMAL
        transform: x
"#;
        let err = DefinitionParser::parse(yaml).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { ref field, .. } if field == "features.f.type"));
    }

    #[test]
    fn test_derived_input_must_be_declared_first() {
        let yaml = r#"
anchors:
  - name: a
    source: PASSTHROUGH
    features:
      - name: f
        type: FLOAT
        transform: x
derived_features:
  - name: d2
    type: FLOAT
    inputs: [d1]
    transform: d1 + 1
  - name: d1
    type: FLOAT
    inputs: [f]
    transform: f * 2
"#;
        let err = DefinitionParser::parse(yaml).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnknownFeature { ref derived, ref input } if derived == "d2" && input == "d1"
        ));
    }

    #[test]
    fn test_aliased_inputs() {
        let yaml = r#"
anchors:
  - name: users
    source: PASSTHROUGH
    features:
      - name: f_spend
        type: DOUBLE
        transform: amount
        key:
          - column: user_id
            type: INT64
derived_features:
  - name: f_spend_ratio
    type: DOUBLE
    key:
      - column: viewer_id
        type: INT64
    inputs:
      - feature: f_spend
        alias: s
        key_alias: [viewer_id]
    transform: s / 100
"#;
        let defs = DefinitionParser::parse(yaml).unwrap();
        let derived = &defs.derived_features[0];
        let input = &derived.input_features[0];
        assert_eq!(input.name(), "f_spend");
        assert_eq!(input.feature_alias(), "s");
        assert_eq!(input.key_alias(), vec!["viewer_id"]);
    }

    #[test]
    fn test_kafka_schema_as_mapping() {
        let yaml = r#"
sources:
  - name: kafkaStreamingSource
    type: kafka
    brokers: ["broker.servicebus.windows.net:9093"]
    topics: [trips]
    avro_schema:
      type: record
      name: DriverTrips
      fields:
        - name: driver_id
          type: long
"#;
        let raw: RawDocument = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(raw.sources.len(), 1);
        assert_eq!(raw.sources[0].name(), "kafkaStreamingSource");
        assert!(DefinitionParser::parse_document(raw).unwrap().is_empty());
    }
}
