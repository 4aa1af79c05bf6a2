//! Benchmark command handler.
//!
//! Implements the `benchmark` subcommand: evaluate every selected tool over
//! the on-disk scenario tree, persist results and print a report.

use crate::benchmark::{BenchmarkRun, BenchmarkRunner};
use crate::config::AppConfig;
use crate::pipeline::{exit_codes, output_benchmark_report};
use crate::registry::AdapterRegistry;
use anyhow::{Context, Result};

/// Run the benchmark command, returning the desired exit code.
///
/// With `dry_run` nothing is written under the benchmarks directory.
pub fn run_benchmark(
    config: &AppConfig,
    registry: &AdapterRegistry,
    dry_run: bool,
    quiet: bool,
) -> Result<i32> {
    let run = BenchmarkRunner::new(config, registry)
        .context("invalid benchmark configuration")?
        .persist(!dry_run)
        .run()
        .context("benchmark run failed")?;

    output_benchmark_report(&config.output, &run, quiet)?;
    Ok(determine_exit_code(config, &run))
}

/// Exit code from the F1 threshold and the scenario failures
fn determine_exit_code(config: &AppConfig, run: &BenchmarkRun) -> i32 {
    let mut code = exit_codes::SUCCESS;
    if let Some(min_f1) = config.benchmark.min_f1 {
        for summary in run.below_threshold(min_f1) {
            tracing::warn!(
                tool = %summary.tool,
                "F1 score {:.4} is below the threshold {min_f1:.4}",
                summary.metrics.f1_score
            );
            code = exit_codes::THRESHOLD_FAILED;
        }
    }
    if config.benchmark.fail_on_errors && run.has_failures() {
        let failed = run.results.iter().filter(|r| r.status.is_failure()).count();
        tracing::warn!("{failed} scenario(s) could not be evaluated");
        code = exit_codes::THRESHOLD_FAILED;
    }
    code
}
