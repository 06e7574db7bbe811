//! Graph analyzer
//!
//! Checks cross-entity consistency of a feature graph before anything is
//! rendered: source identity, name uniqueness and derived-input ordering.

use crate::compiler::CompilerOptions;
use crate::error::{CompileError, Result};
use featureforge_core::{DerivedFeature, FeatureAnchor, FeatureBase, Source};
use std::collections::HashSet;

/// Sources of a graph, de-duplicated by name in first-seen order
#[derive(Debug)]
pub struct AnalyzedGraph<'a> {
    pub sources: Vec<&'a Source>,
}

/// Semantic analyzer for feature graphs
pub struct GraphAnalyzer {
    strict_sources: bool,
    check_duplicate_features: bool,
}

impl GraphAnalyzer {
    pub fn new(options: &CompilerOptions) -> Self {
        Self {
            strict_sources: options.strict_sources,
            check_duplicate_features: options.check_duplicate_features,
        }
    }

    /// Analyze anchors and derived features, failing on the first problem
    pub fn analyze<'a>(
        &self,
        anchors: &'a [FeatureAnchor],
        derived_features: &[DerivedFeature],
    ) -> Result<AnalyzedGraph<'a>> {
        let sources = self.collect_sources(anchors)?;
        let defined = self.check_anchors(anchors)?;
        self.check_derived(derived_features, defined)?;

        Ok(AnalyzedGraph { sources })
    }

    /// De-duplicate sources by name; the input context never gets a block
    fn collect_sources<'a>(&self, anchors: &'a [FeatureAnchor]) -> Result<Vec<&'a Source>> {
        // Source hashes and compares by name only
        let mut seen: HashSet<&'a Source> = HashSet::new();
        let mut ordered = Vec::new();

        for anchor in anchors {
            let source = &anchor.source;
            if source.is_input_context() {
                continue;
            }

            match seen.get(source) {
                None => {
                    seen.insert(source);
                    ordered.push(source);
                }
                Some(first) if first.same_definition(source) => {}
                Some(_) if self.strict_sources => {
                    return Err(CompileError::ConflictingSource {
                        name: source.name().to_string(),
                    });
                }
                Some(_) => {
                    tracing::warn!(
                        "Source '{}' used by anchor '{}' differs from an earlier source with the same name; keeping the first",
                        source.name(),
                        anchor.name
                    );
                }
            }
        }

        Ok(ordered)
    }

    /// Anchor names must be unique; returns the anchored feature names
    fn check_anchors<'a>(&self, anchors: &'a [FeatureAnchor]) -> Result<HashSet<&'a str>> {
        let mut anchor_names = HashSet::new();
        let mut defined = HashSet::new();

        for anchor in anchors {
            if !anchor_names.insert(anchor.name.as_str()) {
                return Err(CompileError::DuplicateAnchor(anchor.name.clone()));
            }

            for feature in &anchor.features {
                if !defined.insert(feature.name.as_str()) && self.check_duplicate_features {
                    return Err(CompileError::DuplicateFeature(feature.name.clone()));
                }
            }
        }

        Ok(defined)
    }

    /// Every derived input must be defined before the derived feature
    fn check_derived<'a>(
        &self,
        derived_features: &'a [DerivedFeature],
        mut defined: HashSet<&'a str>,
    ) -> Result<()> {
        for derived in derived_features {
            let mut aliases = HashSet::new();

            for input in &derived.input_features {
                if !defined.contains(input.name()) {
                    return Err(CompileError::UndefinedInput {
                        derived: derived.name.clone(),
                        input: input.name().to_string(),
                    });
                }

                if !aliases.insert(input.feature_alias()) {
                    return Err(CompileError::DuplicateInputAlias {
                        derived: derived.name.clone(),
                        alias: input.feature_alias().to_string(),
                    });
                }
            }

            if !defined.insert(derived.name.as_str()) && self.check_duplicate_features {
                return Err(CompileError::DuplicateFeature(derived.name.clone()));
            }
        }

        Ok(())
    }
}
