//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".bom-bench.yaml",
    ".bom-bench.yml",
    "bom-bench.yaml",
    "bom-bench.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/bom-bench/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if let Some(path) = find_config_in_dir(&cwd) {
            return Some(path);
        }
    }

    if let Some(git_root) = find_git_root() {
        if let Some(path) = find_config_in_dir(&git_root) {
            return Some(path);
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        if let Some(path) = find_config_in_dir(&config_dir.join("bom-bench")) {
            return Some(path);
        }
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

/// Where `config init` writes by default
#[must_use]
pub fn default_config_path() -> PathBuf {
    PathBuf::from(CONFIG_FILE_NAMES[0])
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from an explicit or discovered file, or fall back to defaults.
///
/// An explicit path that does not exist or fails to parse is an error; a
/// broken discovered file only logs a warning.
pub fn load_or_default(
    explicit_path: Option<&Path>,
) -> Result<(AppConfig, Option<PathBuf>), ConfigFileError> {
    if let Some(path) = explicit_path {
        return load_config_file(path).map(|config| (config, Some(path.to_path_buf())));
    }

    Ok(discover_config_file(None).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    ))
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content from the defaults.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# bom-bench configuration
# Place this file at .bom-bench.yaml in your project root or ~/.config/bom-bench/

{}",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r#"# bom-bench configuration file
# =============================
#
# Place it at:
#   - .bom-bench.yaml in your project root
#   - ~/.config/bom-bench/bom-bench.yaml for global config
#
# CLI arguments always override file settings.

paths:
  # Holds scenarios/<pm>/<scenario>/expected.cdx.json (+ meta.json)
  output_dir: output
  # Holds <tool>/<pm>/<scenario>/actual.cdx.json (default: <output_dir>/benchmarks)
  # benchmarks_dir: output/benchmarks

benchmark:
  # Tools to evaluate (empty: every registered tool with outputs on disk)
  tools: []
  # Package managers (empty: all under scenarios/)
  package_managers: []
  # Scenario names (empty: all)
  scenarios: []
  # Regex on scenario names
  # filter: "^fork-"
  # Worker threads (default: one per CPU)
  # jobs: 8
  # Exit with code 1 when any tool's global F1 is below this
  # min_f1: 0.9
  # Exit with code 1 when scenarios are missing or unreadable
  fail_on_errors: true

normalization:
  # Reject identifiers without a version
  require_version: false
  # Name rule overrides per PURL type: pep503, lowercase, preserve
  name_rules: {}
  #   maven: lowercase
  # PURLs removed from every document before comparison
  exclude:
    - pkg:pypi/project@0.1.0
  # Use component name/version when a PURL is missing
  name_fallback: false

output:
  # Format: summary, json, csv
  format: summary
  # Output file path (omit for stdout)
  # file: report.json
  show_components: false
  no_color: false

tools:
  # Extra CycloneDX-emitting tools
  custom: []
  #   - name: trivy
  #     description: Aqua Trivy
  #     ecosystems: [pypi, npm]
  # Extra package manager -> PURL type mappings
  package_managers: {}
  #   poetry: pypi
"#
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
