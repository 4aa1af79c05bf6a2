//! Building normalized component sets from extracted entries.

use super::cyclonedx::{ComponentEntry, CycloneDxDocument};
use crate::model::{ComponentIdentifier, ComponentSet, Ecosystem};
use crate::normalize::IdentifierNormalizer;
use serde::{Deserialize, Serialize};

/// Counters collected while turning a document into a [`ComponentSet`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Component entries visited, nested ones included
    pub total_entries: usize,
    /// Entries without a PURL (or usable fallback fields)
    pub skipped_entries: usize,
    /// Entries whose identifier failed normalization
    pub malformed: usize,
    /// Entries dropped by the exclusion list
    pub excluded: usize,
    /// Entries that normalized to an identifier already in the set
    pub duplicates: usize,
}

impl ExtractionStats {
    /// Entries that made it into the set
    #[must_use]
    pub const fn accepted(&self) -> usize {
        self.total_entries
            .saturating_sub(self.skipped_entries)
            .saturating_sub(self.malformed)
            .saturating_sub(self.excluded)
            .saturating_sub(self.duplicates)
    }
}

/// Result of extracting one document.
#[derive(Debug, Clone, Default)]
pub struct ExtractedComponents {
    pub components: ComponentSet,
    pub stats: ExtractionStats,
}

/// Extracts and normalizes the component inventory of CycloneDX documents.
#[derive(Debug, Clone)]
pub struct ComponentExtractor<'n> {
    normalizer: &'n IdentifierNormalizer,
    excluded: ComponentSet,
    fallback: Option<Ecosystem>,
}

impl<'n> ComponentExtractor<'n> {
    pub fn new(normalizer: &'n IdentifierNormalizer) -> Self {
        Self {
            normalizer,
            excluded: ComponentSet::new(),
            fallback: None,
        }
    }

    /// Drop these identifiers from every extracted set
    #[must_use]
    pub fn exclude(mut self, ids: impl IntoIterator<Item = ComponentIdentifier>) -> Self {
        self.excluded.extend(ids);
        self
    }

    /// Normalize purl-less entries from their name/version in this ecosystem
    #[must_use]
    pub fn with_fallback(mut self, ecosystem: Option<Ecosystem>) -> Self {
        self.fallback = ecosystem;
        self
    }

    /// Walk the document once and collect its unique components.
    ///
    /// Malformed identifiers are logged and counted, never fatal.
    pub fn extract(&self, document: &CycloneDxDocument) -> ExtractedComponents {
        let entries = match &self.fallback {
            Some(ecosystem) => document.entries_with_fallback(ecosystem.clone()),
            None => document.entries(),
        };

        let mut out = ExtractedComponents::default();
        for entry in entries {
            out.stats.total_entries += 1;
            let raw = match entry {
                ComponentEntry::Identifier(raw) => raw,
                ComponentEntry::MissingPurl { name } => {
                    tracing::debug!(name = name.unwrap_or("<unnamed>"), "Skipping component without purl");
                    out.stats.skipped_entries += 1;
                    continue;
                }
                ComponentEntry::InvalidPurl { name } => {
                    tracing::warn!(name = name.unwrap_or("<unnamed>"), "Skipping component: purl is not a string");
                    out.stats.malformed += 1;
                    continue;
                }
            };

            let id = match self.normalizer.normalize(&raw) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!("Skipping component: {e}");
                    out.stats.malformed += 1;
                    continue;
                }
            };

            if self.excluded.contains(&id) {
                tracing::debug!(purl = %id, "Excluding component");
                out.stats.excluded += 1;
            } else if !out.components.insert(id) {
                out.stats.duplicates += 1;
            }
        }
        out
    }
}
