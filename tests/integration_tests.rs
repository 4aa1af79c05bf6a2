//! Integration tests for bom-bench
//!
//! These tests verify end-to-end functionality of document parsing,
//! comparison, benchmark runs over on-disk scenario trees and reporting.

use bom_bench::{
    benchmark::{BenchmarkResult, BenchmarkRunner, RunSummary},
    cli::{run_compare, CompareConfig},
    compare::{aggregate_all, compare, compute_metrics, MatchCounts, ScenarioMetrics},
    config::{AppConfig, CustomToolConfig, NormalizationConfig, OutputConfig},
    model::{ComponentSet, Ecosystem, ScenarioKey, ScenarioStatus},
    normalize::IdentifierNormalizer,
    parsers::{parse_sbom, parse_sbom_str, ComponentExtractor},
    registry::AdapterRegistry,
    reports::ReportFormat,
    BenchError,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Fixtures
// ============================================================================

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn set(purls: &[&str]) -> ComponentSet {
    let normalizer = IdentifierNormalizer::new();
    purls
        .iter()
        .map(|p| normalizer.normalize_purl(p).expect("valid purl"))
        .collect()
}

fn cdx(purls: &[&str]) -> String {
    let components: Vec<serde_json::Value> = purls
        .iter()
        .map(|p| serde_json::json!({"type": "library", "name": "x", "purl": p}))
        .collect();
    serde_json::json!({
        "bomFormat": "CycloneDX",
        "specVersion": "1.6",
        "components": components,
    })
    .to_string()
}

fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

// ============================================================================
// Comparison Tests
// ============================================================================

mod comparison_tests {
    use super::*;

    #[test]
    fn test_case_difference_is_a_match() {
        let expected = set(&["pkg:pypi/requests@2.31.0", "pkg:pypi/urllib3@2.0.0"]);
        let actual = set(&["pkg:pypi/Requests@2.31.0", "pkg:pypi/idna@3.4"]);

        let result = compare(&expected, &actual);
        assert_eq!(result.true_positives(), &set(&["pkg:pypi/requests@2.31.0"]));
        assert_eq!(result.false_positives(), &set(&["pkg:pypi/idna@3.4"]));
        assert_eq!(result.false_negatives(), &set(&["pkg:pypi/urllib3@2.0.0"]));

        let metrics = compute_metrics(&ScenarioKey::new("syft", "uv", "demo"), &result);
        assert_eq!(metrics.precision, 0.5);
        assert_eq!(metrics.recall, 0.5);
        assert_eq!(metrics.f1_score, 0.5);
    }

    #[test]
    fn test_both_empty_is_perfect() {
        let result = compare(&ComponentSet::new(), &ComponentSet::new());
        let metrics = compute_metrics(&ScenarioKey::new("syft", "uv", "empty"), &result);
        assert_eq!(metrics.precision, 1.0);
        assert_eq!(metrics.recall, 1.0);
        assert_eq!(metrics.f1_score, 1.0);
    }

    #[test]
    fn test_nothing_reported() {
        let result = compare(&set(&["pkg:npm/pkg-a@1.0"]), &ComponentSet::new());
        let metrics = compute_metrics(&ScenarioKey::new("syft", "npm", "silent"), &result);
        assert_eq!(metrics.precision, 1.0);
        assert_eq!(metrics.recall, 0.0);
        assert_eq!(metrics.f1_score, 0.0);
    }

    #[test]
    fn test_only_false_positives() {
        let result = compare(&ComponentSet::new(), &set(&["pkg:npm/pkg-a@1.0"]));
        let metrics = compute_metrics(&ScenarioKey::new("syft", "npm", "noisy"), &result);
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.recall, 1.0);
        assert_eq!(metrics.f1_score, 0.0);
    }

    #[test]
    fn test_recall_is_computed_from_summed_counts() {
        let metrics = [
            ScenarioMetrics::from_counts(ScenarioKey::new("t", "uv", "a"), MatchCounts::new(1, 0, 9)),
            ScenarioMetrics::from_counts(ScenarioKey::new("t", "uv", "b"), MatchCounts::new(9, 0, 1)),
        ];
        let summary = aggregate_all(&metrics);
        assert_eq!(summary.recall, 0.5);
        assert_eq!(summary.counts, MatchCounts::new(10, 0, 10));
        assert_eq!(summary.scenarios, 2);
    }

    #[test]
    fn test_versionless_matches_only_versionless() {
        let expected = set(&["pkg:cargo/serde"]);
        let actual = set(&["pkg:cargo/serde@1.0.200"]);
        let result = compare(&expected, &actual);
        assert!(result.true_positives().is_empty());
        assert_eq!(result.counts(), MatchCounts::new(0, 1, 1));
    }
}

// ============================================================================
// Parser Tests
// ============================================================================

mod parser_tests {
    use super::*;

    #[test]
    fn test_fixture_comparison() {
        let normalizer = IdentifierNormalizer::new();
        let extractor = ComponentExtractor::new(&normalizer);
        let expected = extractor.extract(&parse_sbom(&fixture_path("expected.cdx.json")).unwrap());
        let actual = extractor.extract(&parse_sbom(&fixture_path("actual-syft.cdx.json")).unwrap());

        // metadata.component is the project itself, not a dependency
        assert_eq!(expected.components.len(), 3);
        assert_eq!(expected.stats.total_entries, 3);
        assert_eq!(actual.stats.skipped_entries, 1);

        let result = compare(&expected.components, &actual.components);
        assert_eq!(result.counts(), MatchCounts::new(2, 1, 1));
        assert!(result
            .true_positives()
            .contains(&normalizer.normalize_purl("pkg:pypi/charset-normalizer@3.3.2").unwrap()));
    }

    #[test]
    fn test_unsupported_format_fixture() {
        let err = parse_sbom(&fixture_path("unsupported.spdx.json")).unwrap_err();
        assert!(matches!(err, BenchError::UnsupportedFormat { .. }), "{err}");
    }

    #[test]
    fn test_partial_records_keep_valid_components() {
        let doc = parse_sbom_str(
            r#"{"bomFormat":"CycloneDX","specVersion":"1.6","components":[
                {"name":"a","purl":42},
                {"name":"b","purl":"pkg:npm/b@1","components":null}
            ]}"#,
        )
        .unwrap();
        let normalizer = IdentifierNormalizer::new();
        let out = ComponentExtractor::new(&normalizer).extract(&doc);
        assert_eq!(out.components, set(&["pkg:npm/b@1"]));
        assert_eq!(out.stats.malformed, 1);

        let empty = parse_sbom_str(r#"{"bomFormat":"CycloneDX","specVersion":"1.5","components":null}"#)
            .unwrap();
        assert!(ComponentExtractor::new(&normalizer).extract(&empty).components.is_empty());
    }

    #[test]
    fn test_missing_file_is_not_unsupported() {
        let err = parse_sbom(&fixture_path("does-not-exist.cdx.json")).unwrap_err();
        assert!(matches!(err, BenchError::Io { .. }), "{err}");
    }
}

// ============================================================================
// Benchmark Run Tests
// ============================================================================

mod benchmark_tests {
    use super::*;

    /// uv scenario as plain CycloneDX, pnpm scenario in the legacy wrapper form,
    /// outputs from syft and from a python-only tool declared in config
    fn scenario_tree(root: &Path) {
        let legacy = std::fs::read_to_string(fixture_path("legacy-wrapper.json")).unwrap();
        write(
            &root.join("scenarios/uv/web/expected.cdx.json"),
            &std::fs::read_to_string(fixture_path("expected.cdx.json")).unwrap(),
        );
        write(&root.join("scenarios/pnpm/babel/expected.cdx.json"), &legacy);
        write(&root.join("scenarios/pnpm/conflict/meta.json"), r#"{"satisfiable": false}"#);

        write(
            &root.join("benchmarks/syft/uv/web/actual.cdx.json"),
            &std::fs::read_to_string(fixture_path("actual-syft.cdx.json")).unwrap(),
        );
        write(
            &root.join("benchmarks/syft/pnpm/babel/actual.cdx.json"),
            &cdx(&["pkg:npm/left-pad@1.3.0", "pkg:npm/%40Babel/Core@7.24.0"]),
        );
        write(
            &root.join("benchmarks/pyscan/uv/web/actual.cdx.json"),
            &cdx(&[
                "pkg:pypi/requests@2.31.0",
                "pkg:pypi/urllib3@2.0.0",
                "pkg:pypi/Charset_Normalizer@3.3.2",
            ]),
        );
    }

    fn config(root: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.paths.output_dir = root.to_path_buf();
        config.benchmark.jobs = Some(2);
        config.tools.custom.push(CustomToolConfig {
            name: "pyscan".to_string(),
            description: None,
            ecosystems: vec!["pypi".to_string()],
        });
        config
    }

    fn find<'a>(results: &'a [BenchmarkResult], tool: &str, scenario: &str) -> &'a BenchmarkResult {
        results
            .iter()
            .find(|r| r.key.tool == tool && r.key.scenario == scenario)
            .unwrap_or_else(|| panic!("no result for {tool}/{scenario}"))
    }

    #[test]
    fn test_full_run() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        scenario_tree(root);

        let config = config(root);
        let registry = AdapterRegistry::from_config(&config.tools).unwrap();
        let run = BenchmarkRunner::new(&config, &registry).unwrap().run().unwrap();

        // pyscan does not support npm, so pnpm is only evaluated for syft
        assert_eq!(run.results.len(), 4);
        assert!(!run.results.iter().any(|r| r.key.tool == "pyscan" && r.key.package_manager == "pnpm"));

        let web = find(&run.results, "syft", "web");
        assert_eq!(web.status, ScenarioStatus::Compared);
        assert_eq!(web.key.ecosystem, Some(Ecosystem::PyPi));
        assert_eq!(web.metrics.as_ref().unwrap().counts, MatchCounts::new(2, 1, 1));

        let babel = find(&run.results, "syft", "babel");
        assert_eq!(babel.status, ScenarioStatus::Compared);
        assert_eq!(babel.metrics.as_ref().unwrap().counts, MatchCounts::new(2, 0, 0));

        let conflict = find(&run.results, "syft", "conflict");
        assert_eq!(conflict.status, ScenarioStatus::SkippedUnsatisfiable);
        assert!(!conflict.expected_satisfiable);
        assert!(conflict.metrics.is_none());

        // Charset_Normalizer and charset-normalizer are the same PyPI project
        let pyscan = find(&run.results, "pyscan", "web");
        assert_eq!(pyscan.metrics.as_ref().unwrap().counts, MatchCounts::new(3, 0, 0));

        assert!(!run.has_failures());
        assert_eq!(run.tool_summaries.len(), 2);
        let syft = run.tool_summaries.iter().find(|s| s.tool == "syft").unwrap();
        assert_eq!(syft.total_scenarios, 3);
        assert_eq!(syft.status_breakdown.skipped_unsatisfiable, 1);
        assert_eq!(syft.metrics.counts, MatchCounts::new(4, 1, 1));
        assert_eq!(syft.metrics.scenarios, 2);
    }

    #[test]
    fn test_persisted_layout() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        scenario_tree(root);

        let config = config(root);
        let registry = AdapterRegistry::from_config(&config.tools).unwrap();
        BenchmarkRunner::new(&config, &registry).unwrap().run().unwrap();

        let bench = root.join("benchmarks");
        let result: BenchmarkResult = serde_json::from_str(
            &std::fs::read_to_string(bench.join("syft/uv/web/result.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(result.status, ScenarioStatus::Compared);
        assert_eq!(result.key, ScenarioKey::new("syft", "uv", "web").with_ecosystem(Some(Ecosystem::PyPi)));

        let group: RunSummary = serde_json::from_str(
            &std::fs::read_to_string(bench.join("syft/pnpm/summary.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(group.package_manager.as_deref(), Some("pnpm"));
        assert_eq!(group.total_scenarios, 2);

        let overall: Vec<RunSummary> =
            serde_json::from_str(&std::fs::read_to_string(bench.join("summary.json")).unwrap())
                .unwrap();
        let tools: Vec<&str> = overall.iter().map(|s| s.tool.as_str()).collect();
        assert_eq!(tools, ["pyscan", "syft"]);

        let csv = std::fs::read_to_string(bench.join("syft/pnpm/results.csv")).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.lines().any(|l| l.starts_with("conflict,pnpm,syft,skipped-unsatisfiable,false,")));
        assert!(bench.join("summary.csv").is_file());

        // result files are only written for evaluated pairs
        assert!(!bench.join("pyscan/pnpm").exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        scenario_tree(root);

        let config = config(root);
        let registry = AdapterRegistry::from_config(&config.tools).unwrap();
        let run = BenchmarkRunner::new(&config, &registry)
            .unwrap()
            .persist(false)
            .run()
            .unwrap();
        assert_eq!(run.results.len(), 4);
        assert!(!root.join("benchmarks/summary.json").exists());
        assert!(!root.join("benchmarks/syft/uv/web/result.json").exists());
    }

    #[test]
    fn test_selection_by_tool_and_filter() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        scenario_tree(root);

        let mut config = config(root);
        config.benchmark.tools = vec!["syft".to_string()];
        config.benchmark.package_managers = vec!["pnpm".to_string()];
        config.benchmark.filter = Some("^bab".to_string());
        let registry = AdapterRegistry::from_config(&config.tools).unwrap();
        let run = BenchmarkRunner::new(&config, &registry)
            .unwrap()
            .persist(false)
            .run()
            .unwrap();

        assert_eq!(run.results.len(), 1);
        assert_eq!(run.results[0].key.scenario, "babel");
    }

    #[test]
    fn test_missing_actual_is_reported() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(&root.join("scenarios/uv/lonely/expected.cdx.json"), &cdx(&["pkg:pypi/six@1.16.0"]));
        std::fs::create_dir_all(root.join("benchmarks/syft")).unwrap();

        let mut config = AppConfig::default();
        config.paths.output_dir = root.to_path_buf();
        let registry = AdapterRegistry::builtin();
        let run = BenchmarkRunner::new(&config, &registry)
            .unwrap()
            .persist(false)
            .run()
            .unwrap();

        assert_eq!(run.results.len(), 1);
        assert_eq!(run.results[0].status, ScenarioStatus::MissingActual);
        assert!(run.results[0].error_message.is_some());
        assert!(run.has_failures());
        assert!(run.tool_summaries[0].metrics.is_empty());
    }

    #[test]
    fn test_invalid_filter_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        scenario_tree(root);

        let mut config = config(root);
        config.benchmark.filter = Some("(".to_string());
        let registry = AdapterRegistry::from_config(&config.tools).unwrap();
        let err = BenchmarkRunner::new(&config, &registry)
            .and_then(|runner| runner.run())
            .unwrap_err();
        assert!(matches!(err, BenchError::Config(_)), "{err}");
    }
}

// ============================================================================
// Compare Command Tests
// ============================================================================

mod compare_command_tests {
    use super::*;

    fn compare_config(output_file: PathBuf, min_f1: Option<f64>) -> CompareConfig {
        CompareConfig {
            expected: fixture_path("expected.cdx.json"),
            actual: fixture_path("actual-syft.cdx.json"),
            tool: "syft".to_string(),
            package_manager: Some("uv".to_string()),
            scenario: Some("web".to_string()),
            min_f1,
            normalization: NormalizationConfig::default(),
            output: OutputConfig {
                format: ReportFormat::Json,
                file: Some(output_file),
                show_components: true,
                no_color: true,
            },
            quiet: true,
        }
    }

    #[test]
    fn test_compare_writes_json_report() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("report.json");
        let registry = AdapterRegistry::builtin();

        let code = run_compare(&compare_config(out.clone(), None), &registry).unwrap();
        assert_eq!(code, 0);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["scenario"], "web");
        assert_eq!(value["metrics"]["true_positives"], 2);
        assert_eq!(value["components"]["false_positives"][0], "pkg:pypi/idna@3.4");
        assert_eq!(value["components"]["false_negatives"][0], "pkg:pypi/urllib3@2.0.0");
    }

    #[test]
    fn test_compare_threshold_exit_code() {
        let tmp = TempDir::new().unwrap();
        let registry = AdapterRegistry::builtin();

        let code = run_compare(&compare_config(tmp.path().join("a.json"), Some(0.9)), &registry)
            .unwrap();
        assert_eq!(code, 1);
        let code = run_compare(&compare_config(tmp.path().join("b.json"), Some(0.5)), &registry)
            .unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_compare_unknown_tool_fails() {
        let tmp = TempDir::new().unwrap();
        let mut config = compare_config(tmp.path().join("c.json"), None);
        config.tool = "nope".to_string();
        assert!(run_compare(&config, &AdapterRegistry::builtin()).is_err());
    }
}
