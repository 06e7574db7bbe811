//! Tracing initialization

use crate::config::ClientConfig;
use crate::error::{Result, SdkError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "featureforge_sdk=info,featureforge_compiler=info";

/// Install a global subscriber: `RUST_LOG` wins over `default_filter`.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| SdkError::ConfigError(format!("Failed to initialize tracing: {}", e)))
}

/// Install a global subscriber filtered at `config.log_level`
pub fn init_tracing_from_config(config: &ClientConfig) -> Result<()> {
    init_tracing(&config.tracing_filter())
}
