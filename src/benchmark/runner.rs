//! Benchmark orchestration.
//!
//! For every selected package manager the runner discovers the scenario
//! directories, loads each ground truth once, and evaluates every selected
//! tool against it. Scenarios are processed in parallel on a rayon pool; the
//! [`ResultsStore`] is the only shared state.

use super::loader::{
    discover_package_managers, discover_scenarios, list_dirs, load_expected, ExpectedOutcome,
    ScenarioDir, ScenarioFilter, ACTUAL_FILE,
};
use super::result::{BenchmarkResult, ResultMetrics, RunSummary};
use super::store::{ResultsStore, ResultsWriter};
use crate::compare::{compare, compute_metrics, ScenarioMetrics};
use crate::config::AppConfig;
use crate::error::{BenchError, Result};
use crate::model::{ComponentIdentifier, Ecosystem, ScenarioKey, ScenarioStatus};
use crate::normalize::IdentifierNormalizer;
use crate::parsers::{ComponentExtractor, ExtractedComponents};
use crate::registry::{AdapterRegistry, SbomAdapter};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Status a document-level error maps to
#[must_use]
pub fn status_for_error(err: &BenchError) -> ScenarioStatus {
    match err {
        BenchError::UnsupportedFormat { .. } => ScenarioStatus::FailedUnsupportedFormat,
        _ => ScenarioStatus::FailedParse,
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct BenchmarkRun {
    /// One result per (tool, package manager, scenario), sorted by key
    pub results: Vec<BenchmarkResult>,
    /// One summary per (tool, package manager)
    pub group_summaries: Vec<RunSummary>,
    /// One summary per tool across package managers
    pub tool_summaries: Vec<RunSummary>,
    /// Where results were (or would have been) written
    pub benchmarks_dir: PathBuf,
}

impl BenchmarkRun {
    /// Any scenario that could not be evaluated
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|r| r.status.is_failure())
    }

    /// Tool summaries whose global F1 is below `min_f1`
    #[must_use]
    pub fn below_threshold(&self, min_f1: f64) -> Vec<&RunSummary> {
        self.tool_summaries
            .iter()
            .filter(|s| !s.metrics.is_empty() && s.metrics.f1_score < min_f1)
            .collect()
    }

    /// Metrics of the compared scenarios
    #[must_use]
    pub fn scenario_metrics(&self) -> Vec<ScenarioMetrics> {
        self.results
            .iter()
            .filter_map(BenchmarkResult::scenario_metrics)
            .collect()
    }
}

/// Ground truth of one scenario, loaded and extracted once for all tools.
enum PreparedExpected {
    Missing(String),
    Unsatisfiable(PathBuf),
    Failed {
        status: ScenarioStatus,
        message: String,
        path: PathBuf,
    },
    Ready {
        path: PathBuf,
        extracted: ExtractedComponents,
    },
}

/// One scenario and the tools to evaluate on it.
struct WorkItem {
    scenario: ScenarioDir,
    ecosystem: Option<Ecosystem>,
    tools: Vec<Arc<dyn SbomAdapter>>,
}

/// Runs a benchmark described by an [`AppConfig`].
pub struct BenchmarkRunner<'a> {
    config: &'a AppConfig,
    registry: &'a AdapterRegistry,
    normalizer: IdentifierNormalizer,
    excluded: Vec<ComponentIdentifier>,
    persist: bool,
}

impl<'a> BenchmarkRunner<'a> {
    /// Validate the configuration and prepare normalization
    pub fn new(config: &'a AppConfig, registry: &'a AdapterRegistry) -> Result<Self> {
        config.ensure_valid()?;
        let normalizer = config.normalization.normalizer();
        let excluded = config.normalization.excluded_identifiers(&normalizer)?;
        Ok(Self {
            config,
            registry,
            normalizer,
            excluded,
            persist: true,
        })
    }

    /// Write results to the benchmarks directory (default: true)
    #[must_use]
    pub const fn persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Evaluate every selected scenario and write the results.
    pub fn run(&self) -> Result<BenchmarkRun> {
        let scenarios_dir = self.config.paths.scenarios_dir();
        let benchmarks_dir = self.config.paths.benchmarks_dir();
        let ground_truth = Arc::clone(self.registry.ground_truth()?);

        let tools = self.resolve_tools(&benchmarks_dir)?;
        let package_managers = self.resolve_package_managers(&scenarios_dir)?;
        tracing::info!(
            tools = %names(&tools),
            package_managers = %package_managers.join(","),
            "Starting benchmark"
        );

        let work = self.plan(&scenarios_dir, &tools, &package_managers)?;
        let store = ResultsStore::new();
        let started = Instant::now();
        self.in_pool(|| {
            work.par_iter()
                .for_each(|item| self.evaluate_scenario(item, &*ground_truth, &store));
        })?;
        tracing::info!(
            results = store.len(),
            elapsed = ?started.elapsed(),
            "Benchmark finished"
        );

        let results = store.into_results();
        let run = self.summarize(results, benchmarks_dir);
        if self.persist {
            self.write(&run)?;
        }
        Ok(run)
    }

    /// Explicitly configured tools, or every registered SCA tool with a
    /// directory under the benchmarks dir
    fn resolve_tools(&self, benchmarks_dir: &Path) -> Result<Vec<Arc<dyn SbomAdapter>>> {
        let configured = &self.config.benchmark.tools;
        if !configured.is_empty() {
            return configured
                .iter()
                .map(|tool| self.registry.adapter(tool).map(Arc::clone))
                .collect();
        }

        let present = list_dirs(benchmarks_dir)?;
        for dir in &present {
            if self.registry.get(dir).is_none() {
                tracing::debug!(dir = %dir, "Ignoring directory of unregistered tool");
            }
        }
        let tools: Vec<_> = self
            .registry
            .sca_tools()
            .filter(|tool| present.iter().any(|d| d.as_str() == *tool))
            .filter_map(|tool| self.registry.get(tool).map(Arc::clone))
            .collect();
        if tools.is_empty() {
            tracing::warn!(
                dir = %benchmarks_dir.display(),
                "No tool outputs found"
            );
        }
        Ok(tools)
    }

    fn resolve_package_managers(&self, scenarios_dir: &Path) -> Result<Vec<String>> {
        let configured = &self.config.benchmark.package_managers;
        if configured.is_empty() {
            return discover_package_managers(scenarios_dir);
        }
        Ok(configured.clone())
    }

    fn plan(
        &self,
        scenarios_dir: &Path,
        tools: &[Arc<dyn SbomAdapter>],
        package_managers: &[String],
    ) -> Result<Vec<WorkItem>> {
        let filter = ScenarioFilter::new(
            &self.config.benchmark.scenarios,
            self.config.benchmark.filter.as_deref(),
        )?;

        let mut work = Vec::new();
        for pm in package_managers {
            let ecosystem = self.registry.ecosystem_for(pm).cloned();
            if ecosystem.is_none() {
                tracing::warn!(package_manager = %pm, "Unknown package manager, no ecosystem hint");
            }

            let pm_tools: Vec<_> = tools
                .iter()
                .filter(|tool| {
                    let supported = ecosystem.as_ref().map_or(true, |e| tool.supports(e));
                    if !supported {
                        tracing::info!(tool = tool.name(), package_manager = %pm, "Tool does not support ecosystem, skipping");
                    }
                    supported
                })
                .cloned()
                .collect();
            if pm_tools.is_empty() {
                continue;
            }

            let scenarios = discover_scenarios(scenarios_dir, pm, &filter)?;
            if scenarios.is_empty() {
                tracing::warn!(package_manager = %pm, "No scenarios found");
                continue;
            }
            tracing::info!(package_manager = %pm, scenarios = scenarios.len(), "Discovered scenarios");

            work.extend(scenarios.into_iter().map(|scenario| WorkItem {
                scenario,
                ecosystem: ecosystem.clone(),
                tools: pm_tools.clone(),
            }));
        }
        Ok(work)
    }

    fn in_pool<F: FnOnce() + Send>(&self, f: F) -> Result<()> {
        match self.config.benchmark.jobs {
            Some(jobs) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .build()
                    .map_err(|e| BenchError::config(format!("cannot start {jobs} workers: {e}")))?;
                pool.install(f);
            }
            None => f(),
        }
        Ok(())
    }

    fn extractor(&self, fallback: Option<Ecosystem>) -> ComponentExtractor<'_> {
        let fallback = fallback.filter(|_| self.config.normalization.name_fallback);
        ComponentExtractor::new(&self.normalizer)
            .exclude(self.excluded.iter().cloned())
            .with_fallback(fallback)
    }

    fn prepare_expected(
        &self,
        scenario: &ScenarioDir,
        ecosystem: Option<&Ecosystem>,
        ground_truth: &dyn SbomAdapter,
    ) -> PreparedExpected {
        match load_expected(scenario) {
            Ok(ExpectedOutcome::Missing { reason }) => PreparedExpected::Missing(reason),
            Ok(ExpectedOutcome::Unsatisfiable { path }) => PreparedExpected::Unsatisfiable(path),
            Ok(ExpectedOutcome::Document { path, document }) => {
                let extractor = self.extractor(ground_truth.ecosystem_hint(ecosystem));
                PreparedExpected::Ready {
                    path,
                    extracted: ground_truth.extract(&document, &extractor),
                }
            }
            Err(e) => PreparedExpected::Failed {
                status: status_for_error(&e),
                message: format!("expected SBOM: {e}"),
                path: scenario.expected_path(),
            },
        }
    }

    fn evaluate_scenario(&self, item: &WorkItem, ground_truth: &dyn SbomAdapter, store: &ResultsStore) {
        let expected = self.prepare_expected(&item.scenario, item.ecosystem.as_ref(), ground_truth);
        for tool in &item.tools {
            let key = ScenarioKey::new(
                tool.name(),
                &item.scenario.package_manager,
                &item.scenario.name,
            )
            .with_ecosystem(item.ecosystem.clone());
            let result = self.evaluate(key, tool.as_ref(), item.ecosystem.as_ref(), &expected);
            log_result(&result);
            store.insert(result);
        }
    }

    fn actual_path(&self, key: &ScenarioKey) -> PathBuf {
        self.config
            .paths
            .benchmarks_dir()
            .join(&key.tool)
            .join(&key.package_manager)
            .join(&key.scenario)
            .join(ACTUAL_FILE)
    }

    fn evaluate(
        &self,
        key: ScenarioKey,
        tool: &dyn SbomAdapter,
        ecosystem: Option<&Ecosystem>,
        expected: &PreparedExpected,
    ) -> BenchmarkResult {
        let started = Instant::now();
        let mut result = match expected {
            PreparedExpected::Missing(reason) => {
                BenchmarkResult::with_status(key, ScenarioStatus::MissingExpected).error(reason)
            }
            PreparedExpected::Unsatisfiable(path) => {
                let mut result = BenchmarkResult::with_status(key, ScenarioStatus::SkippedUnsatisfiable);
                result.expected_satisfiable = false;
                result.expected_sbom_path = Some(path.clone());
                result
            }
            PreparedExpected::Failed {
                status,
                message,
                path,
            } => {
                let mut result = BenchmarkResult::with_status(key, *status).error(message);
                result.expected_sbom_path = Some(path.clone());
                result
            }
            PreparedExpected::Ready { path, extracted } => {
                self.compare_actual(key, tool, ecosystem, path, extracted)
            }
        };
        result.duration_seconds = started.elapsed().as_secs_f64();
        result
    }

    fn compare_actual(
        &self,
        key: ScenarioKey,
        tool: &dyn SbomAdapter,
        ecosystem: Option<&Ecosystem>,
        expected_path: &Path,
        expected: &ExtractedComponents,
    ) -> BenchmarkResult {
        let actual_path = self.actual_path(&key);
        let mut result = BenchmarkResult::with_status(key, ScenarioStatus::Compared);
        result.expected_sbom_path = Some(expected_path.to_path_buf());
        result.expected_stats = Some(expected.stats);

        if !actual_path.is_file() {
            result.status = ScenarioStatus::MissingActual;
            result.error_message = Some(format!("{} not found", actual_path.display()));
            return result;
        }
        result.actual_sbom_path = Some(actual_path.clone());

        let document = match tool.read_document(&actual_path) {
            Ok(document) => document,
            Err(e) => {
                result.status = status_for_error(&e);
                result.error_message = Some(format!("actual SBOM: {e}"));
                return result;
            }
        };

        let actual = tool.extract(&document, &self.extractor(tool.ecosystem_hint(ecosystem)));
        let comparison = compare(&expected.components, &actual.components);
        let metrics = compute_metrics(&result.key, &comparison);
        result.actual_stats = Some(actual.stats);
        result.metrics = Some(ResultMetrics {
            counts: metrics.counts,
            precision: metrics.precision,
            recall: metrics.recall,
            f1_score: metrics.f1_score,
            expected_purls: expected.components.to_purls(),
            actual_purls: actual.components.to_purls(),
        });
        result
    }

    fn summarize(&self, results: Vec<BenchmarkResult>, benchmarks_dir: PathBuf) -> BenchmarkRun {
        let mut groups: BTreeMap<(&str, &str), Vec<&BenchmarkResult>> = BTreeMap::new();
        let mut by_tool: BTreeMap<&str, Vec<&BenchmarkResult>> = BTreeMap::new();
        for result in &results {
            groups
                .entry((result.key.tool.as_str(), result.key.package_manager.as_str()))
                .or_default()
                .push(result);
            by_tool.entry(result.key.tool.as_str()).or_default().push(result);
        }

        let group_summaries = groups
            .iter()
            .map(|((tool, pm), group)| {
                RunSummary::from_results(
                    *tool,
                    Some((*pm).to_string()),
                    self.registry.ecosystem_for(pm).cloned(),
                    group.iter().copied(),
                )
            })
            .collect();
        let tool_summaries = by_tool
            .iter()
            .map(|(tool, group)| RunSummary::from_results(*tool, None, None, group.iter().copied()))
            .collect();

        BenchmarkRun {
            results,
            group_summaries,
            tool_summaries,
            benchmarks_dir,
        }
    }

    fn write(&self, run: &BenchmarkRun) -> Result<()> {
        let writer = ResultsWriter::new(&run.benchmarks_dir);
        for result in &run.results {
            writer.write_result(result)?;
        }
        for summary in &run.group_summaries {
            let pm = summary.package_manager.as_deref();
            writer.write_group(
                summary,
                run.results
                    .iter()
                    .filter(|r| r.key.tool == summary.tool && Some(r.key.package_manager.as_str()) == pm),
            )?;
        }
        writer.write_overall(&run.tool_summaries)?;
        tracing::info!(dir = %run.benchmarks_dir.display(), "Results saved");
        Ok(())
    }
}

fn names(tools: &[Arc<dyn SbomAdapter>]) -> String {
    tools.iter().map(|t| t.name()).collect::<Vec<_>>().join(",")
}

fn log_result(result: &BenchmarkResult) {
    match (&result.status, &result.metrics) {
        (ScenarioStatus::Compared, Some(m)) => tracing::info!(
            key = %result.key,
            "P={:.3} R={:.3} F1={:.3}",
            m.precision,
            m.recall,
            m.f1_score
        ),
        (ScenarioStatus::SkippedUnsatisfiable, _) => {
            tracing::info!(key = %result.key, "unsatisfiable (skipped)");
        }
        (status, _) => tracing::warn!(
            key = %result.key,
            status = %status,
            error = result.error_message.as_deref().unwrap_or_default(),
            "Scenario not compared"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cdx(purls: &[&str]) -> String {
        let components: Vec<serde_json::Value> = purls
            .iter()
            .map(|p| serde_json::json!({"name": "x", "purl": p}))
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

    fn config(root: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.paths.output_dir = root.to_path_buf();
        config.benchmark.jobs = Some(2);
        config
    }

    #[test]
    fn test_status_for_error() {
        let err = crate::parsers::parse_sbom_str(r#"{"bomFormat":"SPDX"}"#).unwrap_err();
        assert_eq!(status_for_error(&err), ScenarioStatus::FailedUnsupportedFormat);
        let err = crate::parsers::parse_sbom_str("nope").unwrap_err();
        assert_eq!(status_for_error(&err), ScenarioStatus::FailedParse);
    }

    #[test]
    fn test_run_every_status() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let scenarios = root.join("scenarios/uv");
        let actuals = root.join("benchmarks/syft/uv");

        write(
            &scenarios.join("ok/expected.cdx.json"),
            &cdx(&["pkg:pypi/project@0.1.0", "pkg:pypi/requests@2.31.0", "pkg:pypi/urllib3@2.0.0"]),
        );
        write(
            &actuals.join("ok/actual.cdx.json"),
            &cdx(&["pkg:pypi/Requests@2.31.0", "pkg:pypi/idna@3.4"]),
        );

        write(&scenarios.join("unsat/meta.json"), r#"{"satisfiable": false}"#);
        write(&scenarios.join("no-actual/expected.cdx.json"), &cdx(&[]));
        std::fs::create_dir_all(scenarios.join("no-expected")).unwrap();
        write(&scenarios.join("bad-format/expected.cdx.json"), &cdx(&[]));
        write(
            &actuals.join("bad-format/actual.cdx.json"),
            r#"{"bomFormat":"CycloneDX","specVersion":"1.2"}"#,
        );
        write(&scenarios.join("bad-json/expected.cdx.json"), &cdx(&[]));
        write(&actuals.join("bad-json/actual.cdx.json"), "{");

        let config = config(root);
        let registry = AdapterRegistry::builtin();
        let run = BenchmarkRunner::new(&config, &registry).unwrap().run().unwrap();

        let status = |name: &str| {
            run.results
                .iter()
                .find(|r| r.key.scenario == name)
                .map(|r| r.status)
                .unwrap()
        };
        assert_eq!(run.results.len(), 6);
        assert_eq!(status("ok"), ScenarioStatus::Compared);
        assert_eq!(status("unsat"), ScenarioStatus::SkippedUnsatisfiable);
        assert_eq!(status("no-actual"), ScenarioStatus::MissingActual);
        assert_eq!(status("no-expected"), ScenarioStatus::MissingExpected);
        assert_eq!(status("bad-format"), ScenarioStatus::FailedUnsupportedFormat);
        assert_eq!(status("bad-json"), ScenarioStatus::FailedParse);
        assert!(run.has_failures());

        let ok = run.results.iter().find(|r| r.key.scenario == "ok").unwrap();
        assert_eq!(ok.key.ecosystem, Some(Ecosystem::PyPi));
        let metrics = ok.metrics.as_ref().unwrap();
        assert_eq!(metrics.counts.true_positives, 1);
        assert_eq!(metrics.counts.false_positives, 1);
        assert_eq!(metrics.counts.false_negatives, 1);
        assert_eq!(metrics.precision, 0.5);
        assert_eq!(ok.expected_stats.unwrap().excluded, 1);

        assert_eq!(run.group_summaries.len(), 1);
        assert_eq!(run.tool_summaries.len(), 1);
        assert_eq!(run.tool_summaries[0].metrics.scenarios, 1);
        assert_eq!(run.below_threshold(0.9).len(), 1);
        assert!(run.below_threshold(0.5).is_empty());

        assert!(root.join("benchmarks/syft/uv/ok/result.json").is_file());
        assert!(root.join("benchmarks/syft/uv/results.csv").is_file());
        assert!(root.join("benchmarks/summary.csv").is_file());
    }

    #[test]
    fn test_unknown_tool_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let mut config = config(tmp.path());
        config.benchmark.tools = vec!["nope".to_string()];
        let registry = AdapterRegistry::builtin();
        let err = BenchmarkRunner::new(&config, &registry).unwrap().run().unwrap_err();
        assert!(matches!(err, BenchError::Config(_)));
    }

    #[test]
    fn test_empty_tree_yields_empty_run() {
        let tmp = TempDir::new().unwrap();
        let config = config(tmp.path());
        let registry = AdapterRegistry::builtin();
        let run = BenchmarkRunner::new(&config, &registry)
            .unwrap()
            .persist(false)
            .run()
            .unwrap();
        assert!(run.results.is_empty());
        assert!(!run.has_failures());
    }
}
