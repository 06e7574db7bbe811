//! Main compiler
//!
//! Turns a feature graph (anchors plus derived features) into the complete
//! configuration document consumed by the compute engine.

use crate::codegen::Render;
use crate::error::Result;
use crate::semantic::GraphAnalyzer;
use crate::writer::ConfigWriter;
use featureforge_core::{DerivedFeature, FeatureAnchor, Preprocessing};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Compiler options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerOptions {
    /// Reject same-name sources with different definitions. When off, the
    /// first definition wins and the others are dropped with a warning.
    #[serde(default = "default_true")]
    pub strict_sources: bool,

    /// Reject feature names defined more than once
    #[serde(default = "default_true")]
    pub check_duplicate_features: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            strict_sources: true,
            check_duplicate_features: true,
        }
    }
}

/// Output of a successful compilation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledConfig {
    /// The configuration document
    pub document: String,

    /// Rendered source names, in document order
    pub source_names: Vec<String>,

    /// Secret placeholders to inject before submission, de-duplicated
    pub required_properties: Vec<String>,

    /// Comma-joined feature names of an anchor -> its source's preprocessing
    pub preprocessing: BTreeMap<String, Preprocessing>,
}

/// The FeatureForge config compiler
pub struct ConfigCompiler {
    options: CompilerOptions,
    analyzer: GraphAnalyzer,
}

impl ConfigCompiler {
    /// Create a new compiler instance with default options
    pub fn new() -> Self {
        Self::with_options(CompilerOptions::default())
    }

    /// Create a new compiler instance with custom options
    pub fn with_options(options: CompilerOptions) -> Self {
        let analyzer = GraphAnalyzer::new(&options);
        Self { options, analyzer }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile a feature graph.
    ///
    /// Sources are rendered first (once per name), then anchors, then derived
    /// features in the given order. Any failure aborts the whole document.
    pub fn compile(
        &self,
        anchors: &[FeatureAnchor],
        derived_features: &[DerivedFeature],
    ) -> Result<CompiledConfig> {
        let graph = self.analyzer.analyze(anchors, derived_features)?;

        let mut w = ConfigWriter::new();

        w.open("sources");
        for source in &graph.sources {
            tracing::debug!("Rendering source '{}'", source.name());
            source.write_config(&mut w);
        }
        w.close();
        w.blank();

        w.open("anchors");
        for anchor in anchors {
            tracing::debug!("Rendering anchor '{}'", anchor.name);
            anchor.write_config(&mut w);
        }
        w.close();
        w.blank();

        w.open("derivations");
        for derived in derived_features {
            tracing::debug!("Rendering derived feature '{}'", derived.name);
            derived.write_config(&mut w);
        }
        w.close();

        let mut required_properties: Vec<String> = Vec::new();
        for property in graph.sources.iter().flat_map(|s| s.required_properties()) {
            if !required_properties.contains(&property) {
                required_properties.push(property);
            }
        }

        // Preprocessing of the rendered source, not of a dropped duplicate
        let preprocessing = anchors
            .iter()
            .filter_map(|anchor| {
                graph
                    .sources
                    .iter()
                    .find(|s| s.name() == anchor.source.name())
                    .and_then(|s| s.preprocessing())
                    .map(|p| (anchor.feature_names().join(","), p.clone()))
            })
            .collect();

        let compiled = CompiledConfig {
            document: w.finish(),
            source_names: graph.sources.iter().map(|s| s.name().to_string()).collect(),
            required_properties,
            preprocessing,
        };

        tracing::info!(
            sources = compiled.source_names.len(),
            anchors = anchors.len(),
            derived_features = derived_features.len(),
            "Compiled feature configuration"
        );

        Ok(compiled)
    }
}

impl Default for ConfigCompiler {
    fn default() -> Self {
        Self::new()
    }
}
