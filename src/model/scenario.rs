//! Scenario identity and outcome status.

use super::Ecosystem;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one (tool, package manager, scenario) evaluation.
///
/// This is also the unique key of the results store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScenarioKey {
    /// SCA tool that produced the actual SBOM
    pub tool: String,
    /// Package manager the scenario was resolved with (uv, pnpm, ...)
    pub package_manager: String,
    /// Scenario name
    pub scenario: String,
    /// Ecosystem of the package manager, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecosystem: Option<Ecosystem>,
}

impl ScenarioKey {
    pub fn new(
        tool: impl Into<String>,
        package_manager: impl Into<String>,
        scenario: impl Into<String>,
    ) -> Self {
        Self {
            tool: tool.into(),
            package_manager: package_manager.into(),
            scenario: scenario.into(),
            ecosystem: None,
        }
    }

    #[must_use]
    pub fn with_ecosystem(mut self, ecosystem: Option<Ecosystem>) -> Self {
        self.ecosystem = ecosystem;
        self
    }
}

impl fmt::Display for ScenarioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.tool, self.package_manager, self.scenario)
    }
}

/// Outcome of evaluating one scenario for one tool.
///
/// Every scenario a run visits ends up with exactly one of these; only
/// `Compared` carries metrics and takes part in aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioStatus {
    /// Both documents were extracted and compared
    Compared,
    /// The scenario has no valid resolution; nothing to compare
    SkippedUnsatisfiable,
    /// One of the documents declares an unrecognized schema/version
    FailedUnsupportedFormat,
    /// One of the documents could not be read or is not valid JSON
    FailedParse,
    /// No ground-truth SBOM or meta file for the scenario
    MissingExpected,
    /// The tool produced no SBOM for the scenario
    MissingActual,
}

impl ScenarioStatus {
    pub const ALL: [Self; 6] = [
        Self::Compared,
        Self::SkippedUnsatisfiable,
        Self::FailedUnsupportedFormat,
        Self::FailedParse,
        Self::MissingExpected,
        Self::MissingActual,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Compared => "compared",
            Self::SkippedUnsatisfiable => "skipped-unsatisfiable",
            Self::FailedUnsupportedFormat => "failed-unsupported-format",
            Self::FailedParse => "failed-parse",
            Self::MissingExpected => "missing-expected",
            Self::MissingActual => "missing-actual",
        }
    }

    /// Failures as opposed to legitimate skips
    pub const fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::FailedUnsupportedFormat
                | Self::FailedParse
                | Self::MissingExpected
                | Self::MissingActual
        )
    }
}

impl fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
