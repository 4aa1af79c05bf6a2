//! Report type definitions.

use crate::compare::{compute_metrics, ComparisonResult, ScenarioMetrics};
use crate::model::ScenarioKey;
use crate::parsers::{ExtractedComponents, ExtractionStats};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output format for reports
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Brief human-readable summary
    #[default]
    Summary,
    /// Structured JSON output
    Json,
    /// CSV for spreadsheet import
    Csv,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Summary => write!(f, "summary"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Configuration for report generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// List every TP/FP/FN component, not just the counts
    pub show_components: bool,
    /// Title for the report
    pub title: Option<String>,
    /// Colored terminal output (summary format only)
    pub colored: bool,
}

impl ReportConfig {
    #[must_use]
    pub const fn with_components(mut self, show: bool) -> Self {
        self.show_components = show;
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub const fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }
}

/// Everything a report needs about one ad-hoc comparison.
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub metrics: ScenarioMetrics,
    pub result: ComparisonResult,
    pub expected_stats: ExtractionStats,
    pub actual_stats: ExtractionStats,
    pub expected_path: Option<PathBuf>,
    pub actual_path: Option<PathBuf>,
}

impl ComparisonReport {
    /// Compare two extracted inventories
    pub fn new(key: ScenarioKey, expected: &ExtractedComponents, actual: &ExtractedComponents) -> Self {
        let result = crate::compare::compare(&expected.components, &actual.components);
        Self {
            metrics: compute_metrics(&key, &result),
            result,
            expected_stats: expected.stats,
            actual_stats: actual.stats,
            expected_path: None,
            actual_path: None,
        }
    }

    #[must_use]
    pub fn with_paths(mut self, expected: impl Into<PathBuf>, actual: impl Into<PathBuf>) -> Self {
        self.expected_path = Some(expected.into());
        self.actual_path = Some(actual.into());
        self
    }

    pub const fn key(&self) -> &ScenarioKey {
        &self.metrics.key
    }
}
