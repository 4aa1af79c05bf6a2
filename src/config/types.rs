//! Configuration types for bom-bench operations.
//!
//! Provides structured configuration for the compare and benchmark commands.

use super::defaults::{DEFAULT_EXCLUDED_PURLS, DEFAULT_OUTPUT_DIR};
use crate::normalize::NameRule;
use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI arguments always override values loaded from a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Input/output directory layout
    pub paths: PathsConfig,
    /// Benchmark run selection and behavior
    pub benchmark: BenchmarkConfig,
    /// Identifier normalization rules
    pub normalization: NormalizationConfig,
    /// Report output
    pub output: OutputConfig,
    /// Additional SBOM adapters and package managers
    pub tools: ToolsConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Paths
// ============================================================================

/// Directory layout of a benchmark run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PathsConfig {
    /// Root holding `scenarios/<pm>/<scenario>/expected.cdx.json`
    pub output_dir: PathBuf,
    /// Root holding `<tool>/<pm>/<scenario>/actual.cdx.json` (default: `<output_dir>/benchmarks`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmarks_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            benchmarks_dir: None,
        }
    }
}

impl PathsConfig {
    /// Directory of the ground-truth scenarios
    #[must_use]
    pub fn scenarios_dir(&self) -> PathBuf {
        self.output_dir.join("scenarios")
    }

    /// Directory of the tool outputs and benchmark results
    #[must_use]
    pub fn benchmarks_dir(&self) -> PathBuf {
        self.benchmarks_dir
            .clone()
            .unwrap_or_else(|| self.output_dir.join("benchmarks"))
    }
}

// ============================================================================
// Benchmark
// ============================================================================

/// Which scenarios a benchmark run covers, and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Tools to evaluate (empty: every registered tool with outputs on disk)
    pub tools: Vec<String>,
    /// Package managers to evaluate (empty: every directory under `scenarios/`)
    pub package_managers: Vec<String>,
    /// Scenario names to evaluate (empty: all)
    pub scenarios: Vec<String>,
    /// Regex applied to scenario names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Worker threads (default: one per CPU)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
    /// Fail the run when the global F1 score of any tool is below this
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_f1: Option<f64>,
    /// Exit non-zero when any scenario failed (missing or unreadable documents)
    pub fail_on_errors: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            tools: Vec::new(),
            package_managers: Vec::new(),
            scenarios: Vec::new(),
            filter: None,
            jobs: None,
            min_f1: None,
            fail_on_errors: true,
        }
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Identifier normalization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Treat identifiers without a version as malformed
    pub require_version: bool,
    /// Per-ecosystem name rule overrides, keyed by PURL type
    pub name_rules: BTreeMap<String, NameRule>,
    /// PURLs dropped from every document before comparison
    pub exclude: Vec<String>,
    /// Use name/version of purl-less components when the ecosystem is known
    pub name_fallback: bool,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            require_version: false,
            name_rules: BTreeMap::new(),
            exclude: DEFAULT_EXCLUDED_PURLS.iter().map(ToString::to_string).collect(),
            name_fallback: false,
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// Report output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Report format for stdout
    pub format: ReportFormat,
    /// Write the report to this file instead of stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// List individual components in reports
    pub show_components: bool,
    /// Disable colored output
    pub no_color: bool,
}

// ============================================================================
// Tools
// ============================================================================

/// Additional adapters and package managers on top of the built-in ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ToolsConfig {
    /// Extra CycloneDX-emitting tools
    pub custom: Vec<CustomToolConfig>,
    /// Extra package manager to ecosystem (PURL type) mappings
    pub package_managers: BTreeMap<String, String>,
}

/// A CycloneDX-emitting SCA tool declared in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CustomToolConfig {
    /// Registry key, also the directory name under the benchmarks dir
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// PURL types the tool supports (empty: any)
    #[serde(default)]
    pub ecosystems: Vec<String>,
}
