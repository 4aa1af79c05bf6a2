//! CSV report generator.
//!
//! The same column layouts back the persisted `results.csv` and
//! `summary.csv` files of a benchmark run.

use super::{ComparisonReport, ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::benchmark::{BenchmarkResult, BenchmarkRun, RunSummary};
use std::fmt::Write as _;

const RESULT_COLUMNS: &str = "scenario_name,package_manager,tool_name,status,satisfiable,\
true_positives,false_positives,false_negatives,precision,recall,f1_score,duration_seconds,error_message";

const SUMMARY_COLUMNS: &str = "tool,package_manager,total_scenarios,compared,skipped,failures,\
true_positives,false_positives,false_negatives,precision,recall,f1_score,\
mean_precision,mean_recall,mean_f1,median_precision,median_recall,median_f1";

/// CSV report generator.
pub struct CsvReporter;

impl CsvReporter {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for CsvReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for CsvReporter {
    fn generate_comparison_report(
        &self,
        report: &ComparisonReport,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let m = &report.metrics;
        let mut content = String::new();
        writeln!(
            content,
            "tool_name,scenario_name,true_positives,false_positives,false_negatives,precision,recall,f1_score"
        )?;
        writeln!(
            content,
            "{},{},{},{},{},{:.4},{:.4},{:.4}",
            field(&m.key.tool),
            field(&m.key.scenario),
            m.counts.true_positives,
            m.counts.false_positives,
            m.counts.false_negatives,
            m.precision,
            m.recall,
            m.f1_score
        )?;

        if config.show_components {
            content.push_str("\n# Components\nclassification,purl\n");
            for (label, set) in [
                ("true_positive", report.result.true_positives()),
                ("false_positive", report.result.false_positives()),
                ("false_negative", report.result.false_negatives()),
            ] {
                for id in set {
                    writeln!(content, "{label},{}", field(&id.to_string()))?;
                }
            }
        }
        Ok(content)
    }

    fn generate_benchmark_report(
        &self,
        run: &BenchmarkRun,
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        Ok(results_csv(&run.results))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Csv
    }
}

/// One row per scenario result; metrics are empty unless compared
pub fn results_csv<'a>(results: impl IntoIterator<Item = &'a BenchmarkResult>) -> String {
    let mut content = String::from(RESULT_COLUMNS);
    content.push('\n');
    for r in results {
        let (counts, metrics) = match &r.metrics {
            Some(m) => (
                format!(
                    "{},{},{}",
                    m.counts.true_positives, m.counts.false_positives, m.counts.false_negatives
                ),
                format!("{:.4},{:.4},{:.4}", m.precision, m.recall, m.f1_score),
            ),
            None => (",,".to_string(), ",,".to_string()),
        };
        content.push_str(&format!(
            "{},{},{},{},{},{counts},{metrics},{:.4},{}\n",
            field(&r.key.scenario),
            field(&r.key.package_manager),
            field(&r.key.tool),
            r.status,
            r.expected_satisfiable,
            r.duration_seconds,
            field(r.error_message.as_deref().unwrap_or_default()),
        ));
    }
    content
}

/// One row per summary; the package manager column is empty for tool-wide summaries
pub fn summaries_csv(summaries: &[RunSummary]) -> String {
    let mut content = String::from(SUMMARY_COLUMNS);
    content.push('\n');
    for s in summaries {
        let m = &s.metrics;
        content.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}\n",
            field(&s.tool),
            field(s.package_manager.as_deref().unwrap_or_default()),
            s.total_scenarios,
            s.status_breakdown.compared,
            s.status_breakdown.skipped_unsatisfiable,
            s.status_breakdown.failures(),
            m.counts.true_positives,
            m.counts.false_positives,
            m.counts.false_negatives,
            m.precision,
            m.recall,
            m.f1_score,
            m.mean.precision,
            m.mean.recall,
            m.mean.f1_score,
            m.median.precision,
            m.median.recall,
            m.median.f1_score,
        ));
    }
    content
}

/// Escape a value for inclusion inside a double-quoted CSV field
#[must_use]
pub fn escape_csv(s: &str) -> String {
    s.replace('"', "\"\"").replace(['\n', '\r'], " ")
}

/// Quote a field only when it needs it
fn field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", escape_csv(s))
    } else {
        s.to_string()
    }
}
