//! FeatureForge SDK
//!
//! High-level client for defining features, compiling them into the engine
//! configuration document and preparing a job submission.
//!
//! # Example
//!
//! ```rust,no_run
//! use featureforge_sdk::{FeatureClient, HdfsSource, Feature, FeatureAnchor, FeatureType};
//!
//! # fn main() -> featureforge_sdk::Result<()> {
//! let batch = HdfsSource::new("nycTaxiBatchSource", "abfss://trips/green_tripdata_2020-04.csv")?
//!     .with_event_timestamp_column("lpep_dropoff_datetime")
//!     .with_timestamp_format("yyyy-MM-dd HH:mm:ss");
//! let distance = Feature::new("f_trip_distance", FeatureType::Float, "trip_distance")?;
//! let anchor = FeatureAnchor::new("nonAggFeatures", batch, vec![distance])?;
//!
//! let mut client = FeatureClient::new();
//! client.build_features(vec![anchor], vec![])?;
//! println!("{}", client.features_config()?);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod logging;

// Re-export main types
pub use client::{FeatureClient, SubmissionPayload};
pub use config::ClientConfig;
pub use error::{Result, SdkError};
pub use logging::{init_tracing, init_tracing_from_config, DEFAULT_FILTER};

// Re-export the definition model
pub use featureforge_core::{
    AggregationFunction, AvroJsonSchema, DerivedFeature, Feature, FeatureAnchor, FeatureBase,
    FeatureType, HdfsSource, JdbcSource, KafkaConfig, KafkaSource, Preprocessing, Source,
    SourceSchema, Transformation, TypedKey, ValueType, WindowAggTransformation, DUMMY_KEY,
};

// Re-export compiler and parser types
pub use featureforge_compiler::{CompiledConfig, CompilerOptions, Render};
pub use featureforge_parser::{DefinitionParser, FeatureDefinitions};
