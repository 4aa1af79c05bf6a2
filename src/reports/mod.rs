//! Report generation for comparisons and benchmark runs.
//!
//! This module provides three output formats:
//! - Summary: Compact shell-friendly output
//! - JSON: Structured data for programmatic integration
//! - CSV: Spreadsheet import, also used for the persisted `results.csv`
//!   and `summary.csv` files

mod csv;
mod json;
mod summary;
mod types;

pub use csv::{escape_csv, results_csv, summaries_csv, CsvReporter};
pub use json::JsonReporter;
pub use summary::SummaryReporter;
pub use types::{ComparisonReport, ReportConfig, ReportFormat};

use crate::benchmark::BenchmarkRun;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report for one expected/actual comparison
    fn generate_comparison_report(
        &self,
        report: &ComparisonReport,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Generate a report for a whole benchmark run
    fn generate_benchmark_report(
        &self,
        run: &BenchmarkRun,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Write a comparison report to a writer
    fn write_comparison_report(
        &self,
        report: &ComparisonReport,
        config: &ReportConfig,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let content = self.generate_comparison_report(report, config)?;
        writer.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Write a benchmark report to a writer
    fn write_benchmark_report(
        &self,
        run: &BenchmarkRun,
        config: &ReportConfig,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let content = self.generate_benchmark_report(run, config)?;
        writer.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    create_reporter_with_options(format, true)
}

/// Create a report generator with color control
#[must_use]
pub fn create_reporter_with_options(
    format: ReportFormat,
    use_color: bool,
) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Summary => {
            if use_color {
                Box::new(SummaryReporter::new())
            } else {
                Box::new(SummaryReporter::new().no_color())
            }
        }
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Csv => Box::new(CsvReporter::new()),
    }
}
