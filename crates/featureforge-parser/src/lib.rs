//! FeatureForge Parser - YAML to feature definitions
//!
//! This crate reads a declarative YAML document (sources, anchors, derived
//! features) and builds the corresponding `featureforge-core` entities,
//! resolving references by name.

pub mod definition_parser;
pub mod document;
pub mod error;

// Re-export main parser types
pub use definition_parser::{DefinitionParser, FeatureDefinitions};
pub use error::{ParseError, Result};
