//! Configuration validation for bom-bench.
//!
//! Provides validation traits and implementations for all configuration types.

use super::defaults::MAX_JOBS;
use super::types::{
    AppConfig, BenchmarkConfig, NormalizationConfig, OutputConfig, PathsConfig, ToolsConfig,
};
use crate::normalize::IdentifierNormalizer;
use std::collections::BTreeSet;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.paths.validate());
        errors.extend(self.benchmark.validate());
        errors.extend(self.normalization.validate());
        errors.extend(self.output.validate());
        errors.extend(self.tools.validate());
        errors
    }
}

impl Validatable for PathsConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.output_dir.as_os_str().is_empty() {
            errors.push(ConfigError::new("paths.output_dir", "Must not be empty"));
        }
        if let Some(dir) = &self.benchmarks_dir {
            if dir.as_os_str().is_empty() {
                errors.push(ConfigError::new("paths.benchmarks_dir", "Must not be empty"));
            }
        }
        errors
    }
}

impl Validatable for BenchmarkConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for (field, values) in [
            ("benchmark.tools", &self.tools),
            ("benchmark.package_managers", &self.package_managers),
            ("benchmark.scenarios", &self.scenarios),
        ] {
            if values.iter().any(|v| v.trim().is_empty()) {
                errors.push(ConfigError::new(field, "Entries must not be empty"));
            }
        }

        if let Some(jobs) = self.jobs {
            if jobs == 0 || jobs > MAX_JOBS {
                errors.push(ConfigError::new(
                    "benchmark.jobs",
                    format!("Jobs must be between 1 and {MAX_JOBS}, got {jobs}"),
                ));
            }
        }

        if let Some(min_f1) = self.min_f1 {
            if !(0.0..=1.0).contains(&min_f1) {
                errors.push(ConfigError::new(
                    "benchmark.min_f1",
                    format!("Threshold must be between 0.0 and 1.0, got {min_f1}"),
                ));
            }
        }

        if let Some(filter) = &self.filter {
            if let Err(e) = regex::Regex::new(filter) {
                errors.push(ConfigError::new(
                    "benchmark.filter",
                    format!("Invalid regex '{filter}': {e}"),
                ));
            }
        }

        errors
    }
}

impl Validatable for NormalizationConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for ecosystem in self.name_rules.keys() {
            if ecosystem.trim().is_empty() {
                errors.push(ConfigError::new(
                    "normalization.name_rules",
                    "Ecosystem keys must not be empty",
                ));
            }
        }

        let normalizer = IdentifierNormalizer::new();
        for (i, purl) in self.exclude.iter().enumerate() {
            if let Err(e) = normalizer.normalize_purl(purl) {
                errors.push(ConfigError::new(
                    format!("normalization.exclude[{i}]"),
                    e.to_string(),
                ));
            }
        }

        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(ref file_path) = self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError::new(
                        "output.file",
                        format!("Parent directory does not exist: {}", parent.display()),
                    ));
                }
            }
        }

        errors
    }
}

impl Validatable for ToolsConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut seen = BTreeSet::new();

        for (i, tool) in self.custom.iter().enumerate() {
            let field = format!("tools.custom[{i}].name");
            let name = tool.name.trim();
            if name.is_empty() {
                errors.push(ConfigError::new(field, "Tool name must not be empty"));
            } else if name.contains(['/', '\\']) || name == "." || name == ".." {
                errors.push(ConfigError::new(
                    field,
                    format!("Tool name '{name}' must be usable as a directory name"),
                ));
            } else if !seen.insert(name.to_string()) {
                errors.push(ConfigError::new(field, format!("Duplicate tool '{name}'")));
            }

            if tool.ecosystems.iter().any(|e| e.trim().is_empty()) {
                errors.push(ConfigError::new(
                    format!("tools.custom[{i}].ecosystems"),
                    "Ecosystems must not be empty",
                ));
            }
        }

        for (pm, ecosystem) in &self.package_managers {
            if pm.trim().is_empty() || ecosystem.trim().is_empty() {
                errors.push(ConfigError::new(
                    "tools.package_managers",
                    format!("Invalid mapping '{pm}' -> '{ecosystem}'"),
                ));
            }
        }

        errors
    }
}

// ============================================================================
// Tests
// ============================================================================
