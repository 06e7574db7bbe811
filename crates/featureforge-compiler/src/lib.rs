//! FeatureForge Compiler - feature graph to engine configuration
//!
//! This crate renders FeatureForge definitions into the declarative
//! configuration language of the external feature-computation engine.

pub mod codegen;
pub mod compiler;
pub mod error;
pub mod semantic;
pub mod writer;

// Re-export main types
pub use codegen::Render;
pub use compiler::{CompiledConfig, CompilerOptions, ConfigCompiler};
pub use error::{CompileError, Result};
pub use semantic::{AnalyzedGraph, GraphAnalyzer};
pub use writer::ConfigWriter;
