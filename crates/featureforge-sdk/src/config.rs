//! Client configuration

use featureforge_compiler::CompilerOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for [`FeatureClient`](crate::FeatureClient)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Project the features belong to
    #[serde(default = "default_project_name")]
    pub project_name: String,

    /// Where `write_config` puts the document when no path is given
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Default tracing filter level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_true")]
    pub strict_sources: bool,

    #[serde(default = "default_true")]
    pub check_duplicate_features: bool,
}

fn default_project_name() -> String {
    "featureforge".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("feature_conf/features.conf")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            project_name: default_project_name(),
            output_path: default_output_path(),
            log_level: default_log_level(),
            strict_sources: true,
            check_duplicate_features: true,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a config file and `FEATUREFORGE_*` variables.
    ///
    /// An explicit `path` must exist. Without one, `featureforge.{toml,yaml,json}`
    /// in the working directory is used if present, otherwise defaults apply.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("featureforge").required(false),
        };

        let config_result = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix("FEATUREFORGE").try_parsing(true))
            .build();

        match config_result {
            Ok(cfg) => cfg
                .try_deserialize()
                .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e)),
            Err(e) if path.is_some() => Err(anyhow::anyhow!("Failed to load config: {}", e)),
            Err(_) => {
                tracing::info!("No config file found, using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Compiler options derived from this configuration
    pub fn compiler_options(&self) -> CompilerOptions {
        CompilerOptions {
            strict_sources: self.strict_sources,
            check_duplicate_features: self.check_duplicate_features,
        }
    }

    /// Tracing filter applying `log_level` to every featureforge crate
    pub fn tracing_filter(&self) -> String {
        ["featureforge_sdk", "featureforge_compiler", "featureforge_parser", "featureforge_core"]
            .iter()
            .map(|target| format!("{}={}", target, self.log_level))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn with_log_level(mut self, log_level: impl Into<String>) -> Self {
        self.log_level = log_level.into();
        self
    }

    pub fn with_project_name(mut self, project_name: impl Into<String>) -> Self {
        self.project_name = project_name.into();
        self
    }

    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    pub fn with_strict_sources(mut self, strict: bool) -> Self {
        self.strict_sources = strict;
        self
    }
}
