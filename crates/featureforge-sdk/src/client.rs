//! FeatureClient - build feature definitions and prepare them for submission

use crate::config::ClientConfig;
use crate::error::{Result, SdkError};
use featureforge_compiler::{CompiledConfig, ConfigCompiler};
use featureforge_core::{DerivedFeature, FeatureAnchor, Preprocessing};
use featureforge_parser::{DefinitionParser, FeatureDefinitions};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Everything the job submitter needs: the document, the preprocessing
/// mapping and resolved credential values.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionPayload {
    pub config: String,
    pub preprocessing: BTreeMap<String, Preprocessing>,
    #[serde(skip_serializing)]
    pub properties: BTreeMap<String, String>,
}

/// Client holding the most recently built feature graph
pub struct FeatureClient {
    config: ClientConfig,
    compiler: ConfigCompiler,
    definitions: FeatureDefinitions,
    compiled: Option<CompiledConfig>,
}

impl FeatureClient {
    /// Create a client with default configuration
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> Self {
        let compiler = ConfigCompiler::with_options(config.compiler_options());
        Self {
            config,
            compiler,
            definitions: FeatureDefinitions::default(),
            compiled: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Compile the graph and keep it as the client's current features.
    ///
    /// On failure the previously built features are left untouched.
    pub fn build_features(
        &mut self,
        anchors: Vec<FeatureAnchor>,
        derived_features: Vec<DerivedFeature>,
    ) -> Result<&CompiledConfig> {
        let compiled = self.compiler.compile(&anchors, &derived_features)?;

        tracing::info!(
            project = %self.config.project_name,
            anchors = anchors.len(),
            derived_features = derived_features.len(),
            "Built features"
        );

        self.definitions = FeatureDefinitions {
            anchors,
            derived_features,
        };
        Ok(self.compiled.insert(compiled))
    }

    /// Parse a YAML definition document and build it
    pub fn build_features_from_yaml(&mut self, yaml: &str) -> Result<&CompiledConfig> {
        let definitions = DefinitionParser::parse(yaml)?;
        self.build_features(definitions.anchors, definitions.derived_features)
    }

    /// Read a YAML definition file and build it
    pub fn build_features_from_file(&mut self, path: &Path) -> Result<&CompiledConfig> {
        tracing::debug!("Loading feature definitions from {}", path.display());
        let yaml = std::fs::read_to_string(path)?;
        self.build_features_from_yaml(&yaml)
    }

    pub fn anchors(&self) -> &[FeatureAnchor] {
        &self.definitions.anchors
    }

    pub fn derived_features(&self) -> &[DerivedFeature] {
        &self.definitions.derived_features
    }

    pub fn compiled(&self) -> Option<&CompiledConfig> {
        self.compiled.as_ref()
    }

    fn built(&self) -> Result<&CompiledConfig> {
        self.compiled.as_ref().ok_or(SdkError::NotBuilt)
    }

    /// The rendered configuration document
    pub fn features_config(&self) -> Result<&str> {
        Ok(&self.built()?.document)
    }

    /// Credential placeholders the submitter must provide
    pub fn required_properties(&self) -> Result<&[String]> {
        Ok(&self.built()?.required_properties)
    }

    pub fn preprocessing_functions(&self) -> Result<&BTreeMap<String, Preprocessing>> {
        Ok(&self.built()?.preprocessing)
    }

    /// Write the document to `path`, or to the configured output path.
    /// Parent directories are created as needed.
    pub fn write_config(&self, path: Option<&Path>) -> Result<PathBuf> {
        let document = self.features_config()?;
        let path = path.unwrap_or(self.config.output_path.as_path()).to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, document)?;

        tracing::info!("Wrote feature config to {}", path.display());
        Ok(path)
    }

    /// Resolve every required property through `lookup` and assemble the
    /// submission payload. All missing names are reported together.
    pub fn prepare_submission<F>(&self, lookup: F) -> Result<SubmissionPayload>
    where
        F: Fn(&str) -> Option<String>,
    {
        let compiled = self.built()?;

        let mut properties = BTreeMap::new();
        let mut missing = Vec::new();
        for name in &compiled.required_properties {
            match lookup(name) {
                Some(value) => {
                    properties.insert(name.clone(), value);
                }
                None => missing.push(name.clone()),
            }
        }

        if !missing.is_empty() {
            tracing::warn!("Unresolved required properties: {}", missing.join(", "));
            return Err(SdkError::MissingSecrets(missing));
        }

        Ok(SubmissionPayload {
            config: compiled.document.clone(),
            preprocessing: compiled.preprocessing.clone(),
            properties,
        })
    }

    /// [`prepare_submission`](Self::prepare_submission) reading the process environment
    pub fn prepare_submission_from_env(&self) -> Result<SubmissionPayload> {
        self.prepare_submission(|name| std::env::var(name).ok())
    }
}

impl Default for FeatureClient {
    fn default() -> Self {
        Self::new()
    }
}
