//! Benchmark runs over on-disk scenario trees.
//!
//! A run compares, for every selected tool, package manager and scenario,
//! the tool's `actual.cdx.json` against the scenario's ground truth, and
//! records exactly one [`BenchmarkResult`] with a [`crate::model::ScenarioStatus`].

mod loader;
mod result;
mod runner;
mod store;

pub use loader::{
    discover_package_managers, discover_scenarios, load_expected, ExpectedOutcome, ScenarioDir,
    ScenarioFilter, ACTUAL_FILE, EXPECTED_FILE, META_FILE, RESULT_FILE,
};
pub use result::{BenchmarkResult, ResultMetrics, RunSummary, StatusBreakdown};
pub use runner::{status_for_error, BenchmarkRun, BenchmarkRunner};
pub use store::{ResultsStore, ResultsWriter};
