//! Configuration module for bom-bench.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for common use cases
//! - YAML config file loading and discovery
//!
//! # Configuration File
//!
//! Place a `.bom-bench.yaml` file in your project root or `~/.config/bom-bench/`:
//!
//! ```yaml
//! paths:
//!   output_dir: output
//! benchmark:
//!   tools: [syft, cdxgen]
//!   min_f1: 0.9
//! normalization:
//!   name_rules:
//!     maven: lowercase
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    ConfigPreset, DEFAULT_EXCLUDED_PURLS, DEFAULT_OUTPUT_DIR, GROUND_TRUTH_TOOL, MAX_JOBS,
};
pub use types::{
    AppConfig, BenchmarkConfig, CustomToolConfig, NormalizationConfig, OutputConfig, PathsConfig,
    ToolsConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    default_config_path, discover_config_file, generate_example_config, CONFIG_FILE_NAMES,
    generate_full_example_config, load_config_file, load_or_default, ConfigFileError,
};

use crate::error::{BenchError, Result};
use crate::model::Ecosystem;
use crate::normalize::IdentifierNormalizer;

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.bom-bench.yaml` config files. It can be used by editors for
/// validation and autocompletion.
pub fn generate_json_schema() -> Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    Ok(serde_json::to_string_pretty(&schema)?)
}

impl AppConfig {
    /// Validate everything, collapsing all problems into one error
    pub fn ensure_valid(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(());
        }
        let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
        Err(BenchError::config(joined.join("; ")))
    }
}

impl NormalizationConfig {
    /// Build the identifier normalizer these settings describe
    #[must_use]
    pub fn normalizer(&self) -> IdentifierNormalizer {
        self.name_rules.iter().fold(
            IdentifierNormalizer::new().require_version(self.require_version),
            |normalizer, (ecosystem, rule)| {
                normalizer.with_rule(Ecosystem::from_purl_type(ecosystem), *rule)
            },
        )
    }

    /// Normalized exclusion list
    pub fn excluded_identifiers(
        &self,
        normalizer: &IdentifierNormalizer,
    ) -> Result<Vec<crate::model::ComponentIdentifier>> {
        self.exclude
            .iter()
            .map(|purl| normalizer.normalize_purl(purl))
            .collect()
    }
}
