//! FeatureForge Core - feature definition model
//!
//! This crate provides the entities a caller builds to describe features:
//! - Sources (input context, HDFS, JDBC, Kafka)
//! - Typed keys and value/feature types
//! - Transformations (expressions and window aggregations)
//! - Features, anchors and derived features
//! - Construction-time errors
//!
//! Everything here is an immutable in-memory description; rendering lives in
//! `featureforge-compiler`.

pub mod anchor;
pub mod derived;
pub mod error;
pub mod feature;
pub mod source;
pub mod transformation;
pub mod typed_key;
pub mod types;

// Re-export commonly used types
pub use anchor::FeatureAnchor;
pub use derived::{DerivedFeature, DerivedFeatureBuilder, InputFeature, InputFeatures};
pub use error::{DefinitionError, Result};
pub use feature::{Feature, FeatureBase};
pub use source::{
    AvroJsonSchema, HdfsSource, JdbcAuth, JdbcSource, JdbcSourceBuilder, KafkaConfig, KafkaSource,
    Preprocessing, Source, SourceSchema, DEFAULT_TIMESTAMP_FORMAT, INPUT_CONTEXT_NAME,
};
pub use transformation::{
    AggregationFunction, ExpressionTransformation, Transformation, WindowAggTransformation,
};
pub use typed_key::{TypedKey, DUMMY_KEY, DUMMY_KEY_COLUMN};
pub use types::{FeatureType, ValueType};
