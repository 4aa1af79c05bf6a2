//! Summary report generator for shell output.
//!
//! Provides a compact, human-readable summary for terminal usage.

use super::{ComparisonReport, ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::benchmark::{BenchmarkRun, RunSummary};
use crate::compare::SummaryMetrics;
use crate::model::ComponentSet;

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    /// Green at 0.9 and above, yellow at 0.5 and above, red below
    fn score(&self, value: f64) -> String {
        let color = if value >= 0.9 {
            "green"
        } else if value >= 0.5 {
            "yellow"
        } else {
            "red"
        };
        self.color(&format!("{value:.3}"), color)
    }

    fn metrics_line(&self, precision: f64, recall: f64, f1: f64) -> String {
        format!(
            "P={} R={} F1={}",
            self.score(precision),
            self.score(recall),
            self.score(f1)
        )
    }

    fn component_list(&self, lines: &mut Vec<String>, title: &str, color: &str, set: &ComponentSet) {
        if set.is_empty() {
            return;
        }
        lines.push(self.color(title, "bold"));
        for id in set {
            lines.push(format!("  {}", self.color(&id.to_string(), color)));
        }
    }

    fn summary_block(&self, lines: &mut Vec<String>, label: &str, summary: &RunSummary) {
        let b = &summary.status_breakdown;
        lines.push(format!(
            "{}  {} scenarios: {} compared, {} skipped, {}",
            self.color(label, "cyan"),
            summary.total_scenarios,
            b.compared,
            b.skipped_unsatisfiable,
            if b.failures() > 0 {
                self.color(&format!("{} failed", b.failures()), "red")
            } else {
                "0 failed".to_string()
            }
        ));
        if !summary.metrics.is_empty() {
            lines.push(format!("    {}", self.aggregate_line(&summary.metrics)));
        }
    }

    fn aggregate_line(&self, m: &SummaryMetrics) -> String {
        format!(
            "{}  {}",
            self.metrics_line(m.precision, m.recall, m.f1_score),
            self.color(
                &format!(
                    "(TP={} FP={} FN={}, mean F1={:.3}, median F1={:.3})",
                    m.counts.true_positives,
                    m.counts.false_positives,
                    m.counts.false_negatives,
                    m.mean.f1_score,
                    m.median.f1_score
                ),
                "dim"
            )
        )
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate_comparison_report(
        &self,
        report: &ComparisonReport,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let m = &report.metrics;
        let mut lines = Vec::new();

        lines.push(self.color(
            config.title.as_deref().unwrap_or("SBOM Comparison"),
            "bold",
        ));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));

        if let (Some(expected), Some(actual)) = (&report.expected_path, &report.actual_path) {
            lines.push(format!(
                "{}  {} → {}",
                self.color("Files:", "cyan"),
                expected.display(),
                actual.display()
            ));
        }
        lines.push(format!(
            "{}  {} expected, {} actual components",
            self.color("Size:", "cyan"),
            m.counts.expected_total(),
            m.counts.actual_total()
        ));
        let skipped = report.expected_stats.skipped_entries
            + report.expected_stats.malformed
            + report.actual_stats.skipped_entries
            + report.actual_stats.malformed;
        if skipped > 0 {
            lines.push(format!(
                "{}  {skipped} entries without a usable PURL",
                self.color("Skipped:", "yellow")
            ));
        }
        lines.push(String::new());

        lines.push(format!(
            "  {} true positives, {} false positives, {} false negatives",
            self.color(&m.counts.true_positives.to_string(), "green"),
            self.color(&m.counts.false_positives.to_string(), "yellow"),
            self.color(&m.counts.false_negatives.to_string(), "red"),
        ));
        lines.push(format!("  {}", self.metrics_line(m.precision, m.recall, m.f1_score)));

        if config.show_components {
            lines.push(String::new());
            self.component_list(&mut lines, "False positives:", "yellow", report.result.false_positives());
            self.component_list(&mut lines, "False negatives:", "red", report.result.false_negatives());
            self.component_list(&mut lines, "True positives:", "green", report.result.true_positives());
        }

        Ok(lines.join("\n"))
    }

    fn generate_benchmark_report(
        &self,
        run: &BenchmarkRun,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();
        lines.push(self.color(
            config.title.as_deref().unwrap_or("SCA Benchmark Summary"),
            "bold",
        ));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));

        if run.results.is_empty() {
            lines.push("No scenarios evaluated".to_string());
            return Ok(lines.join("\n"));
        }

        for tool in &run.tool_summaries {
            lines.push(String::new());
            lines.push(self.color(&format!("=== {} ===", tool.tool), "bold"));
            for group in run.group_summaries.iter().filter(|g| g.tool == tool.tool) {
                let label = group.package_manager.as_deref().unwrap_or("-");
                self.summary_block(&mut lines, label, group);
            }
            self.summary_block(&mut lines, "total", tool);
        }

        let failures: Vec<_> = run.results.iter().filter(|r| r.status.is_failure()).collect();
        if !failures.is_empty() {
            lines.push(String::new());
            lines.push(self.color("Not compared:", "bold"));
            for r in failures {
                lines.push(format!(
                    "  {} {}{}",
                    r.key,
                    self.color(r.status.as_str(), "red"),
                    r.error_message
                        .as_deref()
                        .map(|e| format!(": {e}"))
                        .unwrap_or_default()
                ));
            }
        }

        if config.show_components {
            lines.push(String::new());
            lines.push(self.color("Per scenario:", "bold"));
            for r in &run.results {
                match &r.metrics {
                    Some(m) => lines.push(format!(
                        "  {} {}",
                        r.key,
                        self.metrics_line(m.precision, m.recall, m.f1_score)
                    )),
                    None => lines.push(format!("  {} {}", r.key, self.color(r.status.as_str(), "dim"))),
                }
            }
        }

        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}
