//! Per-ecosystem package name canonicalization rules.

use crate::model::Ecosystem;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a package name is canonicalized before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum NameRule {
    /// Lowercase and replace `_` with `-`
    Pep503,
    /// Lowercase only (case-insensitive registries)
    Lowercase,
    /// Exact, case-preserving match
    Preserve,
}

impl NameRule {
    /// Built-in rule for an ecosystem.
    ///
    /// `PyPI` follows PEP 503 as applied by the ground-truth generator; npm and
    /// `NuGet` names are case-insensitive. Everything else is matched exactly.
    pub fn default_for(ecosystem: &Ecosystem) -> Self {
        match ecosystem {
            Ecosystem::PyPi => Self::Pep503,
            Ecosystem::Npm | Ecosystem::Nuget => Self::Lowercase,
            _ => Self::Preserve,
        }
    }

    /// Apply the rule to a raw name
    #[must_use]
    pub fn apply(&self, name: &str) -> String {
        match self {
            Self::Pep503 => name.to_lowercase().replace('_', "-"),
            Self::Lowercase => name.to_lowercase(),
            Self::Preserve => name.to_string(),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pep503 => "pep503",
            Self::Lowercase => "lowercase",
            Self::Preserve => "preserve",
        }
    }
}

impl fmt::Display for NameRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NameRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pep503" | "pep-503" => Ok(Self::Pep503),
            "lowercase" | "case-insensitive" => Ok(Self::Lowercase),
            "preserve" | "exact" => Ok(Self::Preserve),
            other => Err(format!(
                "unknown name rule '{other}' (valid: pep503, lowercase, preserve)"
            )),
        }
    }
}
