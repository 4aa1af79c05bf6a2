//! Per-scenario results and per-run summaries.

use crate::compare::{MatchCounts, ScenarioMetrics, SummaryMetrics};
use crate::model::{Ecosystem, ScenarioKey, ScenarioStatus};
use crate::parsers::ExtractionStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of one (tool, package manager, scenario) evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    #[serde(flatten)]
    pub key: ScenarioKey,
    pub status: ScenarioStatus,
    /// Whether the scenario has a valid resolution
    pub expected_satisfiable: bool,
    /// Present only for `compared`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<ResultMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_stats: Option<ExtractionStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_stats: Option<ExtractionStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_sbom_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_sbom_path: Option<PathBuf>,
    #[serde(default)]
    pub error_message: Option<String>,
    /// Wall time spent loading and comparing
    #[serde(default)]
    pub duration_seconds: f64,
}

/// Persisted metrics of a compared scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetrics {
    #[serde(flatten)]
    pub counts: MatchCounts,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// Canonical PURLs of the expected set
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected_purls: Vec<String>,
    /// Canonical PURLs of the actual set
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actual_purls: Vec<String>,
}

impl BenchmarkResult {
    /// A result without metrics
    pub fn with_status(key: ScenarioKey, status: ScenarioStatus) -> Self {
        Self {
            key,
            status,
            expected_satisfiable: true,
            metrics: None,
            expected_stats: None,
            actual_stats: None,
            expected_sbom_path: None,
            actual_sbom_path: None,
            error_message: None,
            duration_seconds: 0.0,
        }
    }

    #[must_use]
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// The metrics record used for aggregation; `None` unless compared
    pub fn scenario_metrics(&self) -> Option<ScenarioMetrics> {
        if self.status != ScenarioStatus::Compared {
            return None;
        }
        self.metrics.as_ref().map(|m| ScenarioMetrics {
            key: self.key.clone(),
            counts: m.counts,
            precision: m.precision,
            recall: m.recall,
            f1_score: m.f1_score,
        })
    }
}

/// Number of scenarios per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub compared: usize,
    pub skipped_unsatisfiable: usize,
    pub failed_unsupported_format: usize,
    pub failed_parse: usize,
    pub missing_expected: usize,
    pub missing_actual: usize,
}

impl StatusBreakdown {
    pub fn record(&mut self, status: ScenarioStatus) {
        match status {
            ScenarioStatus::Compared => self.compared += 1,
            ScenarioStatus::SkippedUnsatisfiable => self.skipped_unsatisfiable += 1,
            ScenarioStatus::FailedUnsupportedFormat => self.failed_unsupported_format += 1,
            ScenarioStatus::FailedParse => self.failed_parse += 1,
            ScenarioStatus::MissingExpected => self.missing_expected += 1,
            ScenarioStatus::MissingActual => self.missing_actual += 1,
        }
    }

    pub const fn total(&self) -> usize {
        self.compared + self.skipped_unsatisfiable + self.failures()
    }

    /// Scenarios that could not be evaluated for reasons other than unsatisfiability
    pub const fn failures(&self) -> usize {
        self.failed_unsupported_format + self.failed_parse + self.missing_expected + self.missing_actual
    }
}

impl<'a> FromIterator<&'a BenchmarkResult> for StatusBreakdown {
    fn from_iter<I: IntoIterator<Item = &'a BenchmarkResult>>(iter: I) -> Self {
        let mut breakdown = Self::default();
        for result in iter {
            breakdown.record(result.status);
        }
        breakdown
    }
}

/// Summary of one tool over one package manager, or over all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub tool: String,
    /// `None` for a tool-wide summary across package managers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecosystem: Option<Ecosystem>,
    pub total_scenarios: usize,
    pub status_breakdown: StatusBreakdown,
    /// Aggregate over the compared scenarios only
    pub metrics: SummaryMetrics,
    pub generated_at: DateTime<Utc>,
}

impl RunSummary {
    /// Summarize a group of results
    pub fn from_results<'a>(
        tool: impl Into<String>,
        package_manager: Option<String>,
        ecosystem: Option<Ecosystem>,
        results: impl IntoIterator<Item = &'a BenchmarkResult> + Clone,
    ) -> Self {
        let status_breakdown: StatusBreakdown = results.clone().into_iter().collect();
        let metrics: Vec<ScenarioMetrics> = results
            .into_iter()
            .filter_map(BenchmarkResult::scenario_metrics)
            .collect();
        Self {
            tool: tool.into(),
            package_manager,
            ecosystem,
            total_scenarios: status_breakdown.total(),
            status_breakdown,
            metrics: SummaryMetrics::from_metrics(&metrics),
            generated_at: Utc::now(),
        }
    }

    /// Whether any scenario failed to evaluate
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.status_breakdown.failures() > 0
    }
}
