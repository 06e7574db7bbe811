//! Data sources
//!
//! A source describes where the raw records of anchored features come from.
//! The set of source kinds is closed: request-time input context, file-system
//! paths, JDBC tables/queries and Kafka topics.
//!
//! Sources are identified by name. Two sources with the same name are equal
//! and hash identically even if their other fields differ; graph compilation
//! de-duplicates source blocks on this identity. Use
//! [`Source::same_definition`] for a full structural comparison.

use crate::error::{DefinitionError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Name of the request-time passthrough source
pub const INPUT_CONTEXT_NAME: &str = "PASSTHROUGH";

/// Timestamp format used when none is given
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "epoch";

/// Reference to a record-level preprocessing function, resolved by the job
/// runner (e.g. `udfs.add_new_fare_amount`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Preprocessing(String);

impl Preprocessing {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Preprocessing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// External or passthrough data origin
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Source {
    /// Request-time features computed from the observation data itself
    InputContext,
    Hdfs(HdfsSource),
    Jdbc(JdbcSource),
    Kafka(KafkaSource),
}

impl Source {
    pub fn name(&self) -> &str {
        match self {
            Source::InputContext => INPUT_CONTEXT_NAME,
            Source::Hdfs(s) => &s.name,
            Source::Jdbc(s) => &s.name,
            Source::Kafka(s) => &s.name,
        }
    }

    pub fn is_input_context(&self) -> bool {
        matches!(self, Source::InputContext)
    }

    pub fn event_timestamp_column(&self) -> Option<&str> {
        match self {
            Source::Hdfs(s) => s.event_timestamp_column.as_deref(),
            Source::Jdbc(s) => s.event_timestamp_column.as_deref(),
            Source::InputContext | Source::Kafka(_) => None,
        }
    }

    pub fn preprocessing(&self) -> Option<&Preprocessing> {
        match self {
            Source::Hdfs(s) => s.preprocessing.as_ref(),
            Source::Jdbc(s) => s.preprocessing.as_ref(),
            Source::InputContext | Source::Kafka(_) => None,
        }
    }

    pub fn registry_tags(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Source::Hdfs(s) => Some(&s.registry_tags),
            Source::Jdbc(s) => Some(&s.registry_tags),
            Source::Kafka(s) => Some(&s.registry_tags),
            Source::InputContext => None,
        }
    }

    /// Secret placeholders the job runner must inject before submission
    pub fn required_properties(&self) -> Vec<String> {
        match self {
            Source::Jdbc(s) => s.get_required_properties(),
            _ => Vec::new(),
        }
    }

    /// Full structural comparison, unlike `==` which compares names only
    pub fn same_definition(&self, other: &Source) -> bool {
        match (self, other) {
            (Source::InputContext, Source::InputContext) => true,
            (Source::Hdfs(a), Source::Hdfs(b)) => a == b,
            (Source::Jdbc(a), Source::Jdbc(b)) => a == b,
            (Source::Kafka(a), Source::Kafka(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for Source {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Source {}

impl Hash for Source {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl From<HdfsSource> for Source {
    fn from(s: HdfsSource) -> Self {
        Source::Hdfs(s)
    }
}

impl From<JdbcSource> for Source {
    fn from(s: JdbcSource) -> Self {
        Source::Jdbc(s)
    }
}

impl From<KafkaSource> for Source {
    fn from(s: KafkaSource) -> Self {
        Source::Kafka(s)
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DefinitionError::EmptyName { kind: "Source" });
    }
    if name == INPUT_CONTEXT_NAME {
        return Err(DefinitionError::ReservedSourceName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Table stored on an HDFS-like file system, addressed by a POSIX-style path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HdfsSource {
    pub name: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preprocessing: Option<Preprocessing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_timestamp_column: Option<String>,
    /// `epoch`, `epoch_millis`, or a date pattern such as `yyyy-MM-dd HH:mm:ss`
    pub timestamp_format: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub registry_tags: BTreeMap<String, String>,
}

impl HdfsSource {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Result<Self> {
        let name = name.into();
        check_name(&name)?;

        Ok(Self {
            name,
            path: path.into(),
            preprocessing: None,
            event_timestamp_column: None,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            registry_tags: BTreeMap::new(),
        })
    }

    pub fn with_event_timestamp_column(mut self, column: impl Into<String>) -> Self {
        self.event_timestamp_column = Some(column.into());
        self
    }

    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    pub fn with_preprocessing(mut self, preprocessing: Preprocessing) -> Self {
        self.preprocessing = Some(preprocessing);
        self
    }

    pub fn with_registry_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.registry_tags.insert(key.into(), value.into());
        self
    }
}

/// JDBC credential mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JdbcAuth {
    /// `{name}_USER` and `{name}_PASSWORD`
    UserPass,
    /// `{name}_TOKEN`
    Token,
}

impl FromStr for JdbcAuth {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USERPASS" => Ok(JdbcAuth::UserPass),
            "TOKEN" => Ok(JdbcAuth::Token),
            other => Err(other.to_string()),
        }
    }
}

/// Table or query behind a JDBC url
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JdbcSource {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dbtable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<JdbcAuth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preprocessing: Option<Preprocessing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_timestamp_column: Option<String>,
    pub timestamp_format: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub registry_tags: BTreeMap<String, String>,
}

impl JdbcSource {
    pub fn builder(name: impl Into<String>, url: impl Into<String>) -> JdbcSourceBuilder {
        JdbcSourceBuilder::new(name, url)
    }

    /// Names of the secrets that must be injected before the job is submitted
    pub fn get_required_properties(&self) -> Vec<String> {
        match self.auth {
            None => Vec::new(),
            Some(JdbcAuth::UserPass) => vec![
                format!("{}_USER", self.name),
                format!("{}_PASSWORD", self.name),
            ],
            Some(JdbcAuth::Token) => vec![format!("{}_TOKEN", self.name)],
        }
    }
}

/// Builder for [`JdbcSource`]; all validation happens in [`build`](Self::build)
#[derive(Debug, Clone)]
pub struct JdbcSourceBuilder {
    name: String,
    url: String,
    dbtable: Option<String>,
    query: Option<String>,
    auth: Option<String>,
    preprocessing: Option<Preprocessing>,
    event_timestamp_column: Option<String>,
    timestamp_format: String,
    registry_tags: BTreeMap<String, String>,
}

impl JdbcSourceBuilder {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            dbtable: None,
            query: None,
            auth: None,
            preprocessing: None,
            event_timestamp_column: None,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            registry_tags: BTreeMap::new(),
        }
    }

    pub fn dbtable(mut self, dbtable: impl Into<String>) -> Self {
        self.dbtable = Some(dbtable.into());
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Auth mode, `userpass` or `token` in any case
    pub fn auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    pub fn preprocessing(mut self, preprocessing: Preprocessing) -> Self {
        self.preprocessing = Some(preprocessing);
        self
    }

    pub fn event_timestamp_column(mut self, column: impl Into<String>) -> Self {
        self.event_timestamp_column = Some(column.into());
        self
    }

    pub fn timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    pub fn registry_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.registry_tags.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Result<JdbcSource> {
        check_name(&self.name)?;

        if self.dbtable.is_some() && self.query.is_some() {
            return Err(DefinitionError::ConflictingJdbcAccess {
                source_name: self.name,
            });
        }

        let auth = match self.auth {
            Some(value) => Some(value.parse::<JdbcAuth>().map_err(|_| {
                DefinitionError::InvalidAuth {
                    source_name: self.name.clone(),
                    value,
                }
            })?),
            None => None,
        };

        Ok(JdbcSource {
            name: self.name,
            url: self.url,
            dbtable: self.dbtable,
            query: self.query,
            auth,
            preprocessing: self.preprocessing,
            event_timestamp_column: self.event_timestamp_column,
            timestamp_format: self.timestamp_format,
            registry_tags: self.registry_tags,
        })
    }
}

/// Message schema of a streaming source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceSchema {
    AvroJson(AvroJsonSchema),
}

/// Avro schema written as JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvroJsonSchema {
    pub schema_str: String,
}

impl AvroJsonSchema {
    /// Fails when `schema_str` is not a JSON document
    pub fn new(schema_str: impl Into<String>) -> Result<Self> {
        let schema_str = schema_str.into();
        serde_json::from_str::<serde_json::Value>(&schema_str)
            .map_err(|e| DefinitionError::InvalidSchema(e.to_string()))?;
        Ok(Self { schema_str })
    }
}

/// Brokers, topics and message schema of a Kafka source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KafkaConfig {
    pub brokers: Vec<String>,
    pub topics: Vec<String>,
    pub schema: SourceSchema,
}

impl KafkaConfig {
    pub fn new(brokers: Vec<String>, topics: Vec<String>, schema: SourceSchema) -> Self {
        Self { brokers, topics, schema }
    }
}

/// Streaming source used for feature ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KafkaSource {
    pub name: String,
    pub config: KafkaConfig,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub registry_tags: BTreeMap<String, String>,
}

impl KafkaSource {
    pub fn new(name: impl Into<String>, config: KafkaConfig) -> Result<Self> {
        let name = name.into();
        check_name(&name)?;
        Ok(Self {
            name,
            config,
            registry_tags: BTreeMap::new(),
        })
    }

    pub fn with_registry_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.registry_tags.insert(key.into(), value.into());
        self
    }
}
