//! Semantic analysis module
//!
//! Cross-entity checks on a feature graph, run before code generation.

pub mod analyzer;

pub use analyzer::{AnalyzedGraph, GraphAnalyzer};
