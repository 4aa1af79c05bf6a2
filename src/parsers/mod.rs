//! SBOM document parsing and component extraction.
//!
//! Documents are format-checked up front: anything that is not CycloneDX
//! 1.4-1.6 JSON is rejected with [`crate::BenchError::UnsupportedFormat`]
//! before a single component is read.
//!
//! ## Usage
//!
//! ```no_run
//! use bom_bench::normalize::IdentifierNormalizer;
//! use bom_bench::parsers::{parse_sbom, ComponentExtractor};
//! use std::path::Path;
//!
//! let document = parse_sbom(Path::new("actual.cdx.json")).unwrap();
//! let normalizer = IdentifierNormalizer::new();
//! let extracted = ComponentExtractor::new(&normalizer).extract(&document);
//! println!("{} components", extracted.components.len());
//! ```

mod cyclonedx;
mod extract;

pub use cyclonedx::{
    check_format, ComponentEntry, CycloneDxDocument, Extraction, SUPPORTED_SPEC_VERSIONS,
};
pub use extract::{ComponentExtractor, ExtractedComponents, ExtractionStats};

use crate::error::{ErrorContext, Result};
use std::path::Path;

/// Read and format-check a CycloneDX JSON file
pub fn parse_sbom(path: &Path) -> Result<CycloneDxDocument> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| crate::BenchError::io(path, e))?;
    parse_sbom_str(&content).with_context(|| format!("{}", path.display()))
}

/// Format-check CycloneDX JSON content
pub fn parse_sbom_str(content: &str) -> Result<CycloneDxDocument> {
    CycloneDxDocument::from_json_str(content)
}
