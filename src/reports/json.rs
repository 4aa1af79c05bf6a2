//! JSON report generator.

use super::{ComparisonReport, ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::benchmark::{BenchmarkResult, BenchmarkRun, RunSummary};
use crate::compare::{MatchCounts, SummaryMetrics};
use crate::model::{ComponentSet, ScenarioKey};
use crate::parsers::ExtractionStats;
use chrono::Utc;
use serde::Serialize;
use std::borrow::Cow;
use std::path::Path;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn render<T: Serialize>(&self, value: &T) -> Result<String, ReportError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }?;
        Ok(json)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate_comparison_report(
        &self,
        report: &ComparisonReport,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let m = &report.metrics;
        let json = JsonComparisonReport {
            metadata: metadata(config),
            key: &m.key,
            metrics: JsonMetrics {
                counts: m.counts,
                precision: m.precision,
                recall: m.recall,
                f1_score: m.f1_score,
            },
            expected: DocumentInfo {
                path: report.expected_path.as_deref(),
                stats: report.expected_stats,
            },
            actual: DocumentInfo {
                path: report.actual_path.as_deref(),
                stats: report.actual_stats,
            },
            components: config.show_components.then(|| ComponentsReport {
                true_positives: purls(report.result.true_positives()),
                false_positives: purls(report.result.false_positives()),
                false_negatives: purls(report.result.false_negatives()),
            }),
        };
        self.render(&json)
    }

    fn generate_benchmark_report(
        &self,
        run: &BenchmarkRun,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let results = run
            .results
            .iter()
            .map(|r| {
                if config.show_components {
                    return Cow::Borrowed(r);
                }
                let mut stripped = r.clone();
                if let Some(metrics) = stripped.metrics.as_mut() {
                    metrics.expected_purls.clear();
                    metrics.actual_purls.clear();
                }
                Cow::Owned(stripped)
            })
            .collect();

        let json = JsonBenchmarkReport {
            metadata: metadata(config),
            benchmarks_dir: &run.benchmarks_dir,
            overall: SummaryMetrics::from_metrics(&run.scenario_metrics()),
            tools: &run.tool_summaries,
            package_managers: &run.group_summaries,
            results,
        };
        self.render(&json)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

fn metadata(config: &ReportConfig) -> JsonReportMetadata {
    JsonReportMetadata {
        tool: ToolInfo {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        title: config.title.clone(),
        generated_at: Utc::now().to_rfc3339(),
    }
}

fn purls(set: &ComponentSet) -> Vec<String> {
    set.to_purls()
}

// ============================================================================
// JSON report structures
// ============================================================================

#[derive(Serialize)]
struct JsonComparisonReport<'a> {
    metadata: JsonReportMetadata,
    #[serde(flatten)]
    key: &'a ScenarioKey,
    metrics: JsonMetrics,
    expected: DocumentInfo<'a>,
    actual: DocumentInfo<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    components: Option<ComponentsReport>,
}

#[derive(Serialize)]
struct JsonBenchmarkReport<'a> {
    metadata: JsonReportMetadata,
    benchmarks_dir: &'a Path,
    /// Aggregate across every tool and package manager
    overall: SummaryMetrics,
    tools: &'a [RunSummary],
    package_managers: &'a [RunSummary],
    results: Vec<Cow<'a, BenchmarkResult>>,
}

#[derive(Serialize)]
struct JsonReportMetadata {
    tool: ToolInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    generated_at: String,
}

#[derive(Serialize)]
struct ToolInfo {
    name: String,
    version: String,
}

#[derive(Serialize)]
struct JsonMetrics {
    #[serde(flatten)]
    counts: MatchCounts,
    precision: f64,
    recall: f64,
    f1_score: f64,
}

#[derive(Serialize)]
struct DocumentInfo<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a Path>,
    stats: ExtractionStats,
}

#[derive(Serialize)]
struct ComponentsReport {
    true_positives: Vec<String>,
    false_positives: Vec<String>,
    false_negatives: Vec<String>,
}
