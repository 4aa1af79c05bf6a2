//! Identifier normalization.
//!
//! Turns raw, tool-specific package references into canonical
//! [`ComponentIdentifier`] values:
//!
//! - qualifiers and subpaths are dropped, identity is (ecosystem, name, version)
//! - names go through the ecosystem's [`NameRule`]
//! - versions are exact strings, trimmed, with empty treated as absent
//!
//! Normalization is pure and idempotent: the PURL rendering of a normalized
//! identifier normalizes back to the same identifier.

mod rules;

pub use rules::NameRule;

use crate::error::{BenchError, Result};
use crate::model::{ComponentIdentifier, Ecosystem};
use packageurl::PackageUrl;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A package reference as found in an SBOM, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawIdentifier<'a> {
    /// A Package URL string
    Purl(&'a str),
    /// Structured fields, used when a record has no PURL but the ecosystem is known
    Fields {
        ecosystem: Ecosystem,
        name: &'a str,
        version: Option<&'a str>,
    },
}

impl fmt::Display for RawIdentifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Purl(purl) => f.write_str(purl),
            Self::Fields {
                ecosystem,
                name,
                version,
            } => match version {
                Some(v) => write!(f, "{ecosystem}:{name}@{v}"),
                None => write!(f, "{ecosystem}:{name}"),
            },
        }
    }
}

/// Normalizer for package identifiers.
///
/// Built once from configuration and shared read-only across scenarios.
#[derive(Debug, Clone, Default)]
pub struct IdentifierNormalizer {
    require_version: bool,
    overrides: HashMap<Ecosystem, NameRule>,
}

impl IdentifierNormalizer {
    /// Normalizer with the built-in ecosystem rules and optional versions
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat identifiers without a version as malformed
    #[must_use]
    pub fn require_version(mut self, require: bool) -> Self {
        self.require_version = require;
        self
    }

    /// Override the name rule for one ecosystem
    #[must_use]
    pub fn with_rule(mut self, ecosystem: Ecosystem, rule: NameRule) -> Self {
        self.overrides.insert(ecosystem, rule);
        self
    }

    /// The name rule in effect for an ecosystem
    pub fn rule_for(&self, ecosystem: &Ecosystem) -> NameRule {
        self.overrides
            .get(ecosystem)
            .copied()
            .unwrap_or_else(|| NameRule::default_for(ecosystem))
    }

    /// Normalize any raw identifier
    pub fn normalize(&self, raw: &RawIdentifier<'_>) -> Result<ComponentIdentifier> {
        match raw {
            RawIdentifier::Purl(purl) => self.normalize_purl(purl),
            RawIdentifier::Fields {
                ecosystem,
                name,
                version,
            } => self.normalize_fields(ecosystem, name, *version),
        }
    }

    /// Normalize a Package URL string
    pub fn normalize_purl(&self, purl: &str) -> Result<ComponentIdentifier> {
        let trimmed = purl.trim();
        if trimmed.is_empty() {
            return Err(BenchError::malformed(purl, "empty identifier"));
        }

        let parsed = PackageUrl::from_str(trimmed)
            .map_err(|e| BenchError::malformed(purl, e.to_string()))?;

        let ecosystem = Ecosystem::from_purl_type(parsed.ty());
        let name = match parsed.namespace() {
            Some(ns) if !ns.trim().is_empty() => format!("{}/{}", ns.trim(), parsed.name()),
            _ => parsed.name().to_string(),
        };

        self.build(purl, ecosystem, &name, parsed.version())
    }

    /// Normalize structured (ecosystem, name, version) fields
    pub fn normalize_fields(
        &self,
        ecosystem: &Ecosystem,
        name: &str,
        version: Option<&str>,
    ) -> Result<ComponentIdentifier> {
        let raw = RawIdentifier::Fields {
            ecosystem: ecosystem.clone(),
            name,
            version,
        }
        .to_string();
        self.build(&raw, ecosystem.clone(), name, version)
    }

    fn build(
        &self,
        raw: &str,
        ecosystem: Ecosystem,
        name: &str,
        version: Option<&str>,
    ) -> Result<ComponentIdentifier> {
        // empty segments would not survive a PURL rendering
        let name = name
            .split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        if name.is_empty() {
            return Err(BenchError::malformed(raw, "empty package name"));
        }
        if ecosystem.purl_type().is_empty() {
            return Err(BenchError::malformed(raw, "empty ecosystem"));
        }

        let version = version.map(str::trim).filter(|v| !v.is_empty());
        if version.is_none() && self.require_version {
            return Err(BenchError::malformed(raw, "missing version"));
        }

        let name = self.rule_for(&ecosystem).apply(&name);
        Ok(ComponentIdentifier::new(
            ecosystem,
            name,
            version.map(ToString::to_string),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(purl: &str) -> ComponentIdentifier {
        IdentifierNormalizer::new()
            .normalize_purl(purl)
            .expect("valid purl")
    }

    #[test]
    fn test_pypi_case_insensitive() {
        assert_eq!(
            norm("pkg:pypi/Requests@2.31.0"),
            norm("pkg:pypi/requests@2.31.0")
        );
    }

    #[test]
    fn test_pypi_underscore_to_hyphen() {
        let id = norm("pkg:pypi/Typing_Extensions@4.8.0");
        assert_eq!(id.name(), "typing-extensions");
        assert_eq!(id.version(), Some("4.8.0"));
        assert_eq!(id.ecosystem(), &Ecosystem::PyPi);
    }

    #[test]
    fn test_fields_collapse_empty_name_segments() {
        let normalizer = IdentifierNormalizer::new();
        for (raw, expected) in [("/x", "x"), ("a//b", "a/b"), ("x/", "x"), (" a / b ", "a/b")] {
            let id = normalizer
                .normalize_fields(&Ecosystem::Npm, raw, Some("1"))
                .expect("valid fields");
            assert_eq!(id.name(), expected, "{raw}");
            assert_eq!(normalizer.normalize_purl(&id.to_string()).expect("rendered purl"), id);
        }
        assert!(normalizer.normalize_fields(&Ecosystem::Npm, "//", Some("1")).is_err());
    }

    #[test]
    fn test_qualifiers_and_subpath_are_stripped() {
        let plain = norm("pkg:pypi/requests@2.31.0");
        assert_eq!(
            norm("pkg:pypi/requests@2.31.0?file_name=requests-2.31.0-py3-none-any.whl"),
            plain
        );
        assert_eq!(norm("pkg:pypi/requests@2.31.0#src/requests"), plain);
    }

    #[test]
    fn test_maven_preserves_case_and_namespace() {
        let id = norm("pkg:maven/org.Apache.Commons/Commons-Lang3@3.12.0");
        assert_eq!(id.name(), "org.Apache.Commons/Commons-Lang3");
        assert_ne!(id, norm("pkg:maven/org.apache.commons/commons-lang3@3.12.0"));
    }

    #[test]
    fn test_namespace_keeps_packages_distinct() {
        assert_ne!(
            norm("pkg:maven/org.a/util@1.0"),
            norm("pkg:maven/org.b/util@1.0")
        );
    }

    #[test]
    fn test_versions_compare_exactly() {
        assert_ne!(norm("pkg:npm/lodash@4.17.21"), norm("pkg:npm/lodash@4.17.20"));
        assert_ne!(norm("pkg:cargo/serde@1.0"), norm("pkg:cargo/serde@1.0.0"));
    }

    #[test]
    fn test_missing_version_allowed_by_default() {
        let id = norm("pkg:npm/left-pad");
        assert_eq!(id.version(), None);
        assert_ne!(id, norm("pkg:npm/left-pad@1.3.0"));
    }

    #[test]
    fn test_missing_version_rejected_when_required() {
        let normalizer = IdentifierNormalizer::new().require_version(true);
        let err = normalizer
            .normalize_purl("pkg:npm/left-pad")
            .expect_err("version required");
        assert!(matches!(err, BenchError::MalformedIdentifier { .. }));
    }

    #[test]
    fn test_malformed_inputs() {
        let normalizer = IdentifierNormalizer::new();
        for raw in ["", "   ", "requests@2.31.0", "pkg:", "pkg:pypi"] {
            let err = normalizer
                .normalize_purl(raw)
                .expect_err(&format!("'{raw}' should be malformed"));
            assert!(err.is_identifier_level(), "{raw}: {err}");
        }
    }

    #[test]
    fn test_fields_match_purl_form() {
        let normalizer = IdentifierNormalizer::new();
        let from_fields = normalizer
            .normalize_fields(&Ecosystem::PyPi, "Requests", Some("2.31.0"))
            .expect("valid fields");
        assert_eq!(from_fields, norm("pkg:pypi/requests@2.31.0"));

        let err = normalizer
            .normalize_fields(&Ecosystem::PyPi, "  ", Some("1.0"))
            .expect_err("empty name");
        assert!(err.to_string().contains("empty package name"));
    }

    #[test]
    fn test_rule_override() {
        let normalizer = IdentifierNormalizer::new().with_rule(Ecosystem::Maven, NameRule::Lowercase);
        assert_eq!(
            normalizer
                .normalize_purl("pkg:maven/Org.Example/Lib@1.0")
                .expect("valid")
                .name(),
            "org.example/lib"
        );
        assert_eq!(normalizer.rule_for(&Ecosystem::PyPi), NameRule::Pep503);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let normalizer = IdentifierNormalizer::new();
        for raw in [
            "pkg:pypi/Typing_Extensions@4.8.0",
            "pkg:npm/%40Angular/Core@15.0.0",
            "pkg:maven/org.apache.commons/commons-lang3@3.12.0?type=jar",
            "pkg:golang/github.com/Sirupsen/logrus@v1.9.0",
            "pkg:gem/rails",
        ] {
            let once = normalizer.normalize_purl(raw).expect("valid");
            let twice = normalizer.normalize_purl(&once.to_string()).expect("valid");
            assert_eq!(once, twice, "{raw} -> {once}");
        }
    }
}
