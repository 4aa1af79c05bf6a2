//! Results store shared by the benchmark workers, and its on-disk form.
//!
//! ```text
//! <benchmarks_dir>/<tool>/<pm>/<scenario>/result.json
//! <benchmarks_dir>/<tool>/<pm>/summary.json
//! <benchmarks_dir>/<tool>/<pm>/results.csv
//! <benchmarks_dir>/summary.json
//! <benchmarks_dir>/summary.csv
//! ```

use super::loader::RESULT_FILE;
use super::result::{BenchmarkResult, RunSummary};
use crate::error::{BenchError, Result};
use crate::model::ScenarioKey;
use crate::reports::{results_csv, summaries_csv};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Thread-safe collection of results, unique per (tool, package manager, scenario).
#[derive(Debug, Default)]
pub struct ResultsStore {
    results: Mutex<BTreeMap<ScenarioKey, BenchmarkResult>>,
}

impl ResultsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a result. A second result for the same key replaces the first.
    pub fn insert(&self, result: BenchmarkResult) {
        let mut results = self.results.lock().unwrap_or_else(PoisonError::into_inner);
        let key = result.key.clone();
        if let Some(previous) = results.insert(key, result) {
            tracing::warn!(
                key = %previous.key,
                previous = %previous.status,
                "Duplicate result, keeping the latest"
            );
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the results, sorted by key
    #[must_use]
    pub fn results(&self) -> Vec<BenchmarkResult> {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Consume the store, returning the results sorted by key
    #[must_use]
    pub fn into_results(self) -> Vec<BenchmarkResult> {
        self.results
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_values()
            .collect()
    }
}

/// Writes results and summaries under the benchmarks directory.
#[derive(Debug, Clone)]
pub struct ResultsWriter {
    root: PathBuf,
}

impl ResultsWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of one tool and package manager
    #[must_use]
    pub fn group_dir(&self, tool: &str, package_manager: &str) -> PathBuf {
        self.root.join(tool).join(package_manager)
    }

    /// `result.json` of one scenario
    #[must_use]
    pub fn result_path(&self, key: &ScenarioKey) -> PathBuf {
        self.group_dir(&key.tool, &key.package_manager)
            .join(&key.scenario)
            .join(RESULT_FILE)
    }

    pub fn write_result(&self, result: &BenchmarkResult) -> Result<PathBuf> {
        let path = self.result_path(&result.key);
        write_json(&path, result)?;
        Ok(path)
    }

    /// `summary.json` and `results.csv` of one tool and package manager
    pub fn write_group<'a>(
        &self,
        summary: &RunSummary,
        results: impl IntoIterator<Item = &'a BenchmarkResult>,
    ) -> Result<()> {
        let dir = self.group_dir(
            &summary.tool,
            summary.package_manager.as_deref().unwrap_or_default(),
        );
        write_json(&dir.join("summary.json"), summary)?;
        write_text(&dir.join("results.csv"), &results_csv(results))
    }

    /// Top-level `summary.json` and `summary.csv`, one record per tool
    pub fn write_overall(&self, summaries: &[RunSummary]) -> Result<()> {
        write_json(&self.root.join("summary.json"), summaries)?;
        write_text(&self.root.join("summary.csv"), &summaries_csv(summaries))
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    write_text(path, &content)
}

fn write_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| BenchError::io(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| BenchError::io(path, e))?;
    tracing::debug!(path = %path.display(), "Wrote");
    Ok(())
}
