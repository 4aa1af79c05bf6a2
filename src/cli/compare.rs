//! Compare command handler.
//!
//! Implements the `compare` subcommand for scoring one actual SBOM against
//! one expected SBOM.

use crate::config::{NormalizationConfig, OutputConfig};
use crate::model::{Ecosystem, ScenarioKey};
use crate::parsers::ComponentExtractor;
use crate::pipeline::{exit_codes, extract_sbom_with_context, output_comparison_report};
use crate::registry::AdapterRegistry;
use crate::reports::ComparisonReport;
use anyhow::Result;
use std::path::PathBuf;

/// Settings of one `compare` invocation
#[derive(Debug, Clone)]
pub struct CompareConfig {
    /// Ground-truth SBOM
    pub expected: PathBuf,
    /// SBOM produced by the tool under evaluation
    pub actual: PathBuf,
    /// Adapter used to read the actual SBOM
    pub tool: String,
    /// Package manager, used as ecosystem hint
    pub package_manager: Option<String>,
    /// Scenario label in reports (default: parent directory of `actual`)
    pub scenario: Option<String>,
    /// Exit with code 1 when F1 is below this
    pub min_f1: Option<f64>,
    pub normalization: NormalizationConfig,
    pub output: OutputConfig,
    pub quiet: bool,
}

impl CompareConfig {
    fn scenario_label(&self) -> String {
        self.scenario.clone().unwrap_or_else(|| {
            self.actual
                .parent()
                .and_then(|p| p.file_name())
                .map_or_else(|| "-".to_string(), |n| n.to_string_lossy().into_owned())
        })
    }
}

/// Run the compare command, returning the desired exit code.
pub fn run_compare(config: &CompareConfig, registry: &AdapterRegistry) -> Result<i32> {
    let tool = registry.adapter(&config.tool)?;
    let ground_truth = registry.ground_truth()?;
    let ecosystem = config
        .package_manager
        .as_deref()
        .and_then(|pm| registry.ecosystem_for(pm));

    let normalizer = config.normalization.normalizer();
    let excluded = config.normalization.excluded_identifiers(&normalizer)?;
    let extractor = |hint: Option<Ecosystem>| {
        ComponentExtractor::new(&normalizer)
            .exclude(excluded.iter().cloned())
            .with_fallback(if config.normalization.name_fallback { hint } else { None })
    };

    let expected = extract_sbom_with_context(
        &config.expected,
        &**ground_truth,
        &extractor(ground_truth.ecosystem_hint(ecosystem)),
        config.quiet,
    )?;
    let actual = extract_sbom_with_context(
        &config.actual,
        &**tool,
        &extractor(tool.ecosystem_hint(ecosystem)),
        config.quiet,
    )?;

    let key = ScenarioKey::new(
        tool.name(),
        config.package_manager.as_deref().unwrap_or("-"),
        config.scenario_label(),
    )
    .with_ecosystem(ecosystem.cloned());
    let report = ComparisonReport::new(key, &expected, &actual)
        .with_paths(&config.expected, &config.actual);

    output_comparison_report(&config.output, &report, config.quiet)?;
    Ok(determine_exit_code(config.min_f1, report.metrics.f1_score))
}

/// Exit code for an F1 score against an optional threshold
fn determine_exit_code(min_f1: Option<f64>, f1_score: f64) -> i32 {
    match min_f1 {
        Some(min) if f1_score < min => {
            tracing::warn!("F1 score {f1_score:.4} is below the threshold {min:.4}");
            exit_codes::THRESHOLD_FAILED
        }
        _ => exit_codes::SUCCESS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::ReportFormat;
    use tempfile::TempDir;

    const EXPECTED: &str = r#"{"bomFormat":"CycloneDX","specVersion":"1.6","components":[
        {"name":"requests","purl":"pkg:pypi/requests@2.31.0"},
        {"name":"urllib3","purl":"pkg:pypi/urllib3@2.0.0"}]}"#;
    const ACTUAL: &str = r#"{"bomFormat":"CycloneDX","specVersion":"1.5","components":[
        {"name":"requests","purl":"pkg:pypi/requests@2.31.0"}]}"#;

    fn config(tmp: &TempDir) -> CompareConfig {
        let expected = tmp.path().join("expected.cdx.json");
        let actual = tmp.path().join("fork-basic").join("actual.cdx.json");
        std::fs::create_dir_all(actual.parent().unwrap()).unwrap();
        std::fs::write(&expected, EXPECTED).unwrap();
        std::fs::write(&actual, ACTUAL).unwrap();
        CompareConfig {
            expected,
            actual,
            tool: "syft".to_string(),
            package_manager: Some("uv".to_string()),
            scenario: None,
            min_f1: None,
            normalization: NormalizationConfig::default(),
            output: OutputConfig {
                format: ReportFormat::Json,
                file: Some(tmp.path().join("report.json")),
                ..OutputConfig::default()
            },
            quiet: true,
        }
    }

    #[test]
    fn test_run_compare_writes_report() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let code = run_compare(&config, &AdapterRegistry::builtin()).unwrap();
        assert_eq!(code, exit_codes::SUCCESS);

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(tmp.path().join("report.json")).unwrap())
                .unwrap();
        assert_eq!(report["scenario"], "fork-basic");
        assert_eq!(report["metrics"]["precision"], 1.0);
        assert_eq!(report["metrics"]["recall"], 0.5);
    }

    #[test]
    fn test_run_compare_threshold() {
        let tmp = TempDir::new().unwrap();
        let mut config = config(&tmp);
        config.min_f1 = Some(0.9);
        let code = run_compare(&config, &AdapterRegistry::builtin()).unwrap();
        assert_eq!(code, exit_codes::THRESHOLD_FAILED);
    }

    #[test]
    fn test_unknown_tool() {
        let tmp = TempDir::new().unwrap();
        let mut config = config(&tmp);
        config.tool = "nope".to_string();
        assert!(run_compare(&config, &AdapterRegistry::builtin()).is_err());
    }

    #[test]
    fn test_determine_exit_code() {
        assert_eq!(determine_exit_code(None, 0.0), exit_codes::SUCCESS);
        assert_eq!(determine_exit_code(Some(0.5), 0.5), exit_codes::SUCCESS);
        assert_eq!(determine_exit_code(Some(0.5), 0.4), exit_codes::THRESHOLD_FAILED);
    }
}
