//! Default configurations and presets for bom-bench.
//!
//! Provides named presets for common use cases and default values.

use super::types::{AppConfig, BenchmarkConfig, NormalizationConfig};

/// Default root of the scenario and benchmark directories
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// The generated root project; some tools report it as a component, it is never a dependency
pub const DEFAULT_EXCLUDED_PURLS: &[&str] = &["pkg:pypi/project@0.1.0"];

/// Registry key of the ground-truth adapter
pub const GROUND_TRUTH_TOOL: &str = "cyclonedx";

/// Upper bound for `benchmark.jobs`
pub const MAX_JOBS: usize = 256;

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Optional versions, no fallback, fail on scenario errors
    Default,
    /// Every identifier must carry a version
    Strict,
    /// Recover purl-less components from name/version, never fail on scenario errors
    Lenient,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "strict" | "exact" => Some(Self::Strict),
            "lenient" | "permissive" => Some(Self::Lenient),
            _ => None,
        }
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Exact PURL matching with optional versions",
            Self::Strict => "Reject identifiers without a version",
            Self::Lenient => "Fall back to component name/version when a PURL is missing",
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Strict, Self::Lenient]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::Strict => Self {
                normalization: NormalizationConfig {
                    require_version: true,
                    ..NormalizationConfig::default()
                },
                ..Self::default()
            },
            ConfigPreset::Lenient => Self {
                normalization: NormalizationConfig {
                    name_fallback: true,
                    ..NormalizationConfig::default()
                },
                benchmark: BenchmarkConfig {
                    fail_on_errors: false,
                    ..BenchmarkConfig::default()
                },
                ..Self::default()
            },
        }
    }
}
