//! Raw YAML document shape
//!
//! These types mirror the YAML layout one to one. They carry no invariants;
//! [`DefinitionParser`](crate::DefinitionParser) turns them into validated
//! core entities.
//!
//! ```yaml
//! sources:
//!   - name: nycTaxiBatchSource
//!     type: hdfs
//!     path: abfss://container@account.dfs.core.windows.net/green_tripdata_2020-04.csv
//!     event_timestamp_column: lpep_dropoff_datetime
//!     timestamp_format: yyyy-MM-dd HH:mm:ss
//! anchors:
//!   - name: request_features
//!     source: PASSTHROUGH
//!     features:
//!       - name: f_trip_distance
//!         type: FLOAT
//!         transform: trip_distance
//! derived_features:
//!   - name: f_trip_distance_km
//!     type: FLOAT
//!     inputs: [f_trip_distance]
//!     transform: f_trip_distance * 1.609
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;

/// A whole definition document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDocument {
    #[serde(default)]
    pub sources: Vec<RawSource>,

    #[serde(default)]
    pub anchors: Vec<RawAnchor>,

    #[serde(default)]
    pub derived_features: Vec<RawDerivedFeature>,
}

/// A source, tagged by `type`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum RawSource {
    Hdfs {
        name: String,
        path: String,
        #[serde(default)]
        preprocessing: Option<String>,
        #[serde(default)]
        event_timestamp_column: Option<String>,
        #[serde(default)]
        timestamp_format: Option<String>,
        #[serde(default)]
        registry_tags: BTreeMap<String, String>,
    },
    Jdbc {
        name: String,
        url: String,
        #[serde(default)]
        dbtable: Option<String>,
        #[serde(default)]
        query: Option<String>,
        #[serde(default)]
        auth: Option<String>,
        #[serde(default)]
        preprocessing: Option<String>,
        #[serde(default)]
        event_timestamp_column: Option<String>,
        #[serde(default)]
        timestamp_format: Option<String>,
        #[serde(default)]
        registry_tags: BTreeMap<String, String>,
    },
    Kafka {
        name: String,
        brokers: Vec<String>,
        topics: Vec<String>,
        /// Either a JSON string or an inline YAML mapping
        avro_schema: serde_yaml::Value,
        #[serde(default)]
        registry_tags: BTreeMap<String, String>,
    },
}

impl RawSource {
    pub fn name(&self) -> &str {
        match self {
            RawSource::Hdfs { name, .. } | RawSource::Jdbc { name, .. } | RawSource::Kafka { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAnchor {
    pub name: String,

    /// Source name, or `PASSTHROUGH` for request-time features
    pub source: String,

    pub features: Vec<RawFeature>,

    #[serde(default)]
    pub registry_tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawFeature {
    pub name: String,

    #[serde(rename = "type")]
    pub feature_type: String,

    #[serde(default)]
    pub key: Vec<RawTypedKey>,

    /// Row expression; exclusive with `window_agg`
    #[serde(default)]
    pub transform: Option<String>,

    #[serde(default)]
    pub window_agg: Option<RawWindowAgg>,

    #[serde(default)]
    pub registry_tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTypedKey {
    pub column: String,

    #[serde(rename = "type", default = "default_key_type")]
    pub value_type: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub full_name: Option<String>,

    #[serde(default)]
    pub alias: Option<String>,
}

fn default_key_type() -> String {
    "UNSPECIFIED".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawWindowAgg {
    pub expr: String,
    pub func: String,
    pub window: String,
    #[serde(default)]
    pub group_by: Option<String>,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDerivedFeature {
    pub name: String,

    #[serde(rename = "type")]
    pub feature_type: String,

    #[serde(default)]
    pub key: Vec<RawTypedKey>,

    pub inputs: Vec<RawInput>,

    #[serde(default)]
    pub transform: Option<String>,

    #[serde(default)]
    pub registry_tags: BTreeMap<String, String>,
}

/// A derived feature input: a bare name or a name with aliases
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawInput {
    Name(String),
    Aliased {
        feature: String,
        #[serde(default)]
        alias: Option<String>,
        #[serde(default)]
        key_alias: Option<Vec<String>>,
    },
}

impl RawInput {
    pub fn feature_name(&self) -> &str {
        match self {
            RawInput::Name(name) => name,
            RawInput::Aliased { feature, .. } => feature,
        }
    }
}
