//! SBOM adapter trait and the CycloneDX implementation.

use crate::error::Result;
use crate::model::Ecosystem;
use crate::parsers::{parse_sbom, parse_sbom_str, ComponentExtractor, CycloneDxDocument, ExtractedComponents};
use std::path::Path;

/// What the benchmark needs from one SCA tool's output.
///
/// Implementations must be thread-safe; one instance serves every scenario.
pub trait SbomAdapter: Send + Sync {
    /// Registry key, also the tool's directory name under the benchmarks dir
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// Ecosystems the tool can inventory (empty: any)
    fn supported_ecosystems(&self) -> &[Ecosystem];

    fn supports(&self, ecosystem: &Ecosystem) -> bool {
        let supported = self.supported_ecosystems();
        supported.is_empty() || supported.contains(ecosystem)
    }

    /// Ecosystem to assume for components that carry no PURL.
    ///
    /// A single-ecosystem tool answers with that ecosystem; otherwise the
    /// scenario's package manager decides.
    fn ecosystem_hint(&self, package_manager: Option<&Ecosystem>) -> Option<Ecosystem> {
        match self.supported_ecosystems() {
            [only] => Some(only.clone()),
            _ => package_manager.cloned(),
        }
    }

    /// Read and format-check one output document
    fn read_document(&self, path: &Path) -> Result<CycloneDxDocument> {
        parse_sbom(path)
    }

    /// Format-check in-memory output
    fn parse_document(&self, content: &str) -> Result<CycloneDxDocument> {
        parse_sbom_str(content)
    }

    /// Pull the normalized component inventory out of a document
    fn extract(
        &self,
        document: &CycloneDxDocument,
        extractor: &ComponentExtractor<'_>,
    ) -> ExtractedComponents {
        extractor.extract(document)
    }
}

/// Adapter for any tool that writes CycloneDX JSON.
#[derive(Debug, Clone)]
pub struct CycloneDxAdapter {
    name: String,
    description: String,
    ecosystems: Vec<Ecosystem>,
}

impl CycloneDxAdapter {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ecosystems: Vec::new(),
        }
    }

    /// Restrict the adapter to these ecosystems
    #[must_use]
    pub fn with_ecosystems(mut self, ecosystems: impl IntoIterator<Item = Ecosystem>) -> Self {
        self.ecosystems = ecosystems.into_iter().collect();
        self
    }
}

impl SbomAdapter for CycloneDxAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn supported_ecosystems(&self) -> &[Ecosystem] {
        &self.ecosystems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::IdentifierNormalizer;

    #[test]
    fn test_ecosystem_hint() {
        let any = CycloneDxAdapter::new("syft", "Syft");
        assert_eq!(any.ecosystem_hint(Some(&Ecosystem::Npm)), Some(Ecosystem::Npm));
        assert_eq!(any.ecosystem_hint(None), None);
        assert!(any.supports(&Ecosystem::Cargo));

        let python_only = CycloneDxAdapter::new("pip-audit", "pip-audit")
            .with_ecosystems([Ecosystem::PyPi]);
        assert_eq!(python_only.ecosystem_hint(None), Some(Ecosystem::PyPi));
        assert!(!python_only.supports(&Ecosystem::Npm));
    }

    #[test]
    fn test_parse_and_extract() {
        let adapter = CycloneDxAdapter::new("syft", "Syft");
        let document = adapter
            .parse_document(
                r#"{"bomFormat":"CycloneDX","specVersion":"1.5","components":[{"name":"idna","purl":"pkg:pypi/idna@3.4"}]}"#,
            )
            .unwrap();
        let normalizer = IdentifierNormalizer::new();
        let extracted = adapter.extract(&document, &ComponentExtractor::new(&normalizer));
        assert_eq!(extracted.components.to_purls(), vec!["pkg:pypi/idna@3.4"]);
    }
}
