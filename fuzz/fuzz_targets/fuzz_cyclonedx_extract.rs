#![no_main]
use bom_bench::normalize::IdentifierNormalizer;
use bom_bench::parsers::{parse_sbom_str, ComponentExtractor};
use libfuzzer_sys::fuzz_target;

const MAX_WRAPPED_INPUT_LEN: usize = 10_000;

/// Fuzz CycloneDX format checking and component extraction.
///
/// Prefixes input with a minimal CycloneDX JSON wrapper to increase
/// the likelihood of reaching extraction rather than failing at the
/// format check.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let normalizer = IdentifierNormalizer::new();
        let extractor = ComponentExtractor::new(&normalizer);

        if let Ok(document) = parse_sbom_str(s) {
            let extracted = extractor.extract(&document);
            assert_eq!(extracted.stats.accepted(), extracted.components.len());
        }

        if s.len() < MAX_WRAPPED_INPUT_LEN {
            let wrapped = format!(
                r#"{{"bomFormat":"CycloneDX","specVersion":"1.6","components":[{s}]}}"#,
            );
            if let Ok(document) = parse_sbom_str(&wrapped) {
                let _ = extractor.extract(&document);
            }
        }
    }
});
