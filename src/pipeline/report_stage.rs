//! Report output stage.
//!
//! Renders comparison and benchmark reports in the configured format and
//! writes them to stdout or a file.

use crate::benchmark::BenchmarkRun;
use crate::config::OutputConfig;
use crate::reports::{create_reporter_with_options, ComparisonReport, ReportConfig};
use anyhow::Result;

use super::{should_use_color, write_output, OutputTarget};

fn report_config(config: &OutputConfig, target: &OutputTarget) -> ReportConfig {
    ReportConfig::default()
        .with_components(config.show_components)
        .colored(should_use_color(config.no_color, target))
}

/// Output a comparison report to the configured destination.
pub fn output_comparison_report(
    config: &OutputConfig,
    report: &ComparisonReport,
    quiet: bool,
) -> Result<()> {
    let target = OutputTarget::from_option(config.file.clone());
    let report_config = report_config(config, &target);
    let reporter = create_reporter_with_options(config.format, report_config.colored);
    let content = reporter.generate_comparison_report(report, &report_config)?;
    write_output(&content, &target, quiet)
}

/// Output a benchmark report to the configured destination.
pub fn output_benchmark_report(config: &OutputConfig, run: &BenchmarkRun, quiet: bool) -> Result<()> {
    let target = OutputTarget::from_option(config.file.clone());
    let report_config = report_config(config, &target);
    let reporter = create_reporter_with_options(config.format, report_config.colored);
    let content = reporter.generate_benchmark_report(run, &report_config)?;
    write_output(&content, &target, quiet)
}
