//! Feature value types
//!
//! The compute engine stores every feature as a tensor. Scalars are
//! zero-dimensional dense tensors, vectors are one-dimensional.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared type of a feature value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureType {
    Boolean,
    Int32,
    Int64,
    Float,
    Double,
    String,
    Bytes,
    FloatVector,
    Int32Vector,
    Int64Vector,
    DoubleVector,
}

impl FeatureType {
    /// Engine tensor value type (`valType`)
    pub fn val_type(&self) -> &'static str {
        match self {
            FeatureType::Boolean => "BOOLEAN",
            FeatureType::Int32 | FeatureType::Int32Vector => "INT",
            FeatureType::Int64 | FeatureType::Int64Vector => "LONG",
            FeatureType::Float | FeatureType::FloatVector => "FLOAT",
            FeatureType::Double | FeatureType::DoubleVector => "DOUBLE",
            FeatureType::String => "STRING",
            FeatureType::Bytes => "BYTES",
        }
    }

    /// Engine tensor dimension types (`dimensionType`)
    pub fn dimension_types(&self) -> &'static [&'static str] {
        if self.is_vector() {
            &["INT"]
        } else {
            &[]
        }
    }

    pub fn is_vector(&self) -> bool {
        matches!(
            self,
            FeatureType::FloatVector
                | FeatureType::Int32Vector
                | FeatureType::Int64Vector
                | FeatureType::DoubleVector
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureType::Boolean => "BOOLEAN",
            FeatureType::Int32 => "INT32",
            FeatureType::Int64 => "INT64",
            FeatureType::Float => "FLOAT",
            FeatureType::Double => "DOUBLE",
            FeatureType::String => "STRING",
            FeatureType::Bytes => "BYTES",
            FeatureType::FloatVector => "FLOAT_VECTOR",
            FeatureType::Int32Vector => "INT32_VECTOR",
            FeatureType::Int64Vector => "INT64_VECTOR",
            FeatureType::DoubleVector => "DOUBLE_VECTOR",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BOOLEAN" | "BOOL" => Ok(FeatureType::Boolean),
            "INT32" | "INT" => Ok(FeatureType::Int32),
            "INT64" | "LONG" => Ok(FeatureType::Int64),
            "FLOAT" => Ok(FeatureType::Float),
            "DOUBLE" => Ok(FeatureType::Double),
            "STRING" => Ok(FeatureType::String),
            "BYTES" => Ok(FeatureType::Bytes),
            "FLOAT_VECTOR" => Ok(FeatureType::FloatVector),
            "INT32_VECTOR" => Ok(FeatureType::Int32Vector),
            "INT64_VECTOR" => Ok(FeatureType::Int64Vector),
            "DOUBLE_VECTOR" => Ok(FeatureType::DoubleVector),
            other => Err(format!("unknown feature type: {}", other)),
        }
    }
}
