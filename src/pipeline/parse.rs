//! SBOM loading stage.
//!
//! Reads one document through its adapter and extracts the normalized inventory.

use crate::parsers::{ComponentExtractor, ExtractedComponents};
use crate::registry::SbomAdapter;
use anyhow::{Context, Result};
use std::path::Path;

/// Read an SBOM with context for error messages and extract its components
pub fn extract_sbom_with_context(
    path: &Path,
    adapter: &dyn SbomAdapter,
    extractor: &ComponentExtractor<'_>,
    quiet: bool,
) -> Result<ExtractedComponents> {
    if !quiet {
        tracing::info!("Parsing SBOM: {:?}", path);
    }

    let document = adapter
        .read_document(path)
        .with_context(|| format!("Failed to load SBOM for {}: {}", adapter.name(), path.display()))?;
    let extracted = adapter.extract(&document, extractor);

    if !quiet {
        tracing::info!(
            "Extracted {} components (CycloneDX {}, {} entries skipped, {} malformed)",
            extracted.components.len(),
            document.spec_version(),
            extracted.stats.skipped_entries,
            extracted.stats.malformed
        );
    }

    Ok(extracted)
}
