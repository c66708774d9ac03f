//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::path::Path;

use super::defaults::*;
use super::{global_config_path, Config};

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: LibConfigBuilder<config::builder::DefaultState>,
    key: &str,
    value: T,
) -> Result<LibConfigBuilder<config::builder::DefaultState>> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `RANKDUP_` and use double underscores
    /// for nested values. For example:
    /// - `RANKDUP_SHINGLING__LENGTH=5`
    /// - `RANKDUP_NEAR_DUPLICATES__THRESHOLD=0.9`
    pub fn from_file(path: &Path) -> Result<Self> {
        let builder = ConfigLib::builder();

        // Scalar defaults are set explicitly so env overrides of a single key
        // still deserialize when the file omits the whole section
        let builder = set_config_default(builder, "evaluation.top_n", default_top_n() as i64)?;
        let builder = set_config_default(builder, "grading.k", default_grading_k() as i64)?;
        let builder = set_config_default(
            builder,
            "shingling.length",
            default_shingle_length() as i64,
        )?;
        let builder = set_config_default(
            builder,
            "near_duplicates.threshold",
            default_near_duplicate_threshold(),
        )?;
        let mut builder = set_config_default(
            builder,
            "corpus.delimiter",
            default_corpus_delimiter(),
        )?;

        // Add the config file if it exists
        if path.exists() {
            builder = builder.add_source(File::from(path));
        } else {
            tracing::debug!("Config file {} not found, using defaults", path.display());
        }

        // Add environment variables with RANKDUP_ prefix
        builder = builder.add_source(
            Environment::with_prefix("RANKDUP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from a single file
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (~/.rankdup/config.toml or custom --config path)
    /// 3. Environment variables (RANKDUP_*)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => global_config_path()?,
        };
        Self::from_file(&path)
    }
}
