//! Key column value types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Primitive type of a key column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    Unspecified,
    Bool,
    Int32,
    Int64,
    Float,
    Double,
    String,
    Bytes,
}

impl ValueType {
    /// Name used in definitions and by the external catalog
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Unspecified => "UNSPECIFIED",
            ValueType::Bool => "BOOL",
            ValueType::Int32 => "INT32",
            ValueType::Int64 => "INT64",
            ValueType::Float => "FLOAT",
            ValueType::Double => "DOUBLE",
            ValueType::String => "STRING",
            ValueType::Bytes => "BYTES",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "UNSPECIFIED" => Ok(ValueType::Unspecified),
            "BOOL" | "BOOLEAN" => Ok(ValueType::Bool),
            "INT32" | "INT" => Ok(ValueType::Int32),
            "INT64" | "LONG" => Ok(ValueType::Int64),
            "FLOAT" => Ok(ValueType::Float),
            "DOUBLE" => Ok(ValueType::Double),
            "STRING" => Ok(ValueType::String),
            "BYTES" => Ok(ValueType::Bytes),
            other => Err(format!("unknown value type: {}", other)),
        }
    }
}
