//! Canonical identifiers for SBOM components.
//!
//! A [`ComponentIdentifier`] is the normalized (ecosystem, name, version) tuple
//! that two SBOMs are compared on. Identifiers are only built by the
//! normalizer, so two values compare equal exactly when their canonical
//! tuples are equal, whatever the raw spelling in the source documents was.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ecosystem/package type, keyed by the PURL type string
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Ecosystem {
    Npm,
    PyPi,
    Cargo,
    Maven,
    Golang,
    Nuget,
    RubyGems,
    Composer,
    CocoaPods,
    Swift,
    Hex,
    Pub,
    Hackage,
    Cpan,
    Cran,
    Conda,
    Conan,
    Deb,
    Rpm,
    Apk,
    Generic,
    Unknown(String),
}

impl Ecosystem {
    /// Parse ecosystem from PURL type
    pub fn from_purl_type(purl_type: &str) -> Self {
        match purl_type.trim().to_lowercase().as_str() {
            "npm" => Self::Npm,
            "pypi" => Self::PyPi,
            "cargo" => Self::Cargo,
            "maven" => Self::Maven,
            "golang" | "go" => Self::Golang,
            "nuget" => Self::Nuget,
            "gem" => Self::RubyGems,
            "composer" => Self::Composer,
            "cocoapods" => Self::CocoaPods,
            "swift" => Self::Swift,
            "hex" => Self::Hex,
            "pub" => Self::Pub,
            "hackage" => Self::Hackage,
            "cpan" => Self::Cpan,
            "cran" => Self::Cran,
            "conda" => Self::Conda,
            "conan" => Self::Conan,
            "deb" => Self::Deb,
            "rpm" => Self::Rpm,
            "apk" => Self::Apk,
            "generic" => Self::Generic,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The PURL type string for this ecosystem
    pub fn purl_type(&self) -> &str {
        match self {
            Self::Npm => "npm",
            Self::PyPi => "pypi",
            Self::Cargo => "cargo",
            Self::Maven => "maven",
            Self::Golang => "golang",
            Self::Nuget => "nuget",
            Self::RubyGems => "gem",
            Self::Composer => "composer",
            Self::CocoaPods => "cocoapods",
            Self::Swift => "swift",
            Self::Hex => "hex",
            Self::Pub => "pub",
            Self::Hackage => "hackage",
            Self::Cpan => "cpan",
            Self::Cran => "cran",
            Self::Conda => "conda",
            Self::Conan => "conan",
            Self::Deb => "deb",
            Self::Rpm => "rpm",
            Self::Apk => "apk",
            Self::Generic => "generic",
            Self::Unknown(s) => s,
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.purl_type())
    }
}

impl From<String> for Ecosystem {
    fn from(value: String) -> Self {
        Self::from_purl_type(&value)
    }
}

impl From<Ecosystem> for String {
    fn from(value: Ecosystem) -> Self {
        value.purl_type().to_string()
    }
}

/// Canonical identity of one package occurrence.
///
/// Ordering is lexicographic on (ecosystem, name, version) with a missing
/// version sorting first, which keeps every set built from these values
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentIdentifier {
    ecosystem: Ecosystem,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

impl ComponentIdentifier {
    /// Build an identifier from already-canonical parts.
    ///
    /// Callers outside the normalizer must go through
    /// [`crate::normalize::IdentifierNormalizer`] so equality stays meaningful.
    pub(crate) fn new(ecosystem: Ecosystem, name: String, version: Option<String>) -> Self {
        Self {
            ecosystem,
            name,
            version,
        }
    }

    pub fn ecosystem(&self) -> &Ecosystem {
        &self.ecosystem
    }

    /// Canonical name; a PURL namespace is folded in as `namespace/name`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Short `name@version` label used in logs and text reports
    pub fn label(&self) -> String {
        match &self.version {
            Some(v) => format!("{}@{}", self.name, v),
            None => self.name.clone(),
        }
    }
}

/// Renders as a PURL that normalizes back to the same identifier.
impl fmt::Display for ComponentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pkg:{}/", self.ecosystem)?;
        let segments: Vec<String> = self.name.split('/').map(encode_segment).collect();
        f.write_str(&segments.join("/"))?;
        if let Some(version) = &self.version {
            write!(f, "@{}", encode_segment(version))?;
        }
        Ok(())
    }
}

/// Percent-encode the characters that carry structure in a PURL.
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            '%' => out.push_str("%25"),
            '@' => out.push_str("%40"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            ' ' => out.push_str("%20"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ecosystem_from_purl_type() {
        assert_eq!(Ecosystem::from_purl_type("pypi"), Ecosystem::PyPi);
        assert_eq!(Ecosystem::from_purl_type("PyPI"), Ecosystem::PyPi);
        assert_eq!(Ecosystem::from_purl_type("go"), Ecosystem::Golang);
        assert_eq!(
            Ecosystem::from_purl_type("bitbucket"),
            Ecosystem::Unknown("bitbucket".to_string())
        );
    }

    #[test]
    fn test_ecosystem_display_roundtrip() {
        for eco in [Ecosystem::PyPi, Ecosystem::RubyGems, Ecosystem::Golang] {
            assert_eq!(Ecosystem::from_purl_type(&eco.to_string()), eco);
        }
    }

    #[test]
    fn test_ecosystem_serializes_as_purl_type() {
        let json = serde_json::to_string(&Ecosystem::RubyGems).expect("serialize");
        assert_eq!(json, "\"gem\"");
        let back: Ecosystem = serde_json::from_str("\"npm\"").expect("deserialize");
        assert_eq!(back, Ecosystem::Npm);
    }

    #[test]
    fn test_identifier_display() {
        let id = ComponentIdentifier::new(
            Ecosystem::PyPi,
            "requests".to_string(),
            Some("2.31.0".to_string()),
        );
        assert_eq!(id.to_string(), "pkg:pypi/requests@2.31.0");
        assert_eq!(id.label(), "requests@2.31.0");

        let versionless = ComponentIdentifier::new(Ecosystem::Npm, "left-pad".to_string(), None);
        assert_eq!(versionless.to_string(), "pkg:npm/left-pad");
    }

    #[test]
    fn test_identifier_display_encodes_scope() {
        let id = ComponentIdentifier::new(
            Ecosystem::Npm,
            "@angular/core".to_string(),
            Some("15.0.0".to_string()),
        );
        assert_eq!(id.to_string(), "pkg:npm/%40angular/core@15.0.0");
    }

    #[test]
    fn test_identifier_ordering_is_by_tuple() {
        let a = ComponentIdentifier::new(Ecosystem::PyPi, "a".to_string(), None);
        let b = ComponentIdentifier::new(Ecosystem::PyPi, "a".to_string(), Some("1".to_string()));
        let c = ComponentIdentifier::new(Ecosystem::PyPi, "b".to_string(), None);
        assert!(a < b);
        assert!(b < c);
    }
}
