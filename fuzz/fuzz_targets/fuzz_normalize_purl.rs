#![no_main]
use bom_bench::normalize::IdentifierNormalizer;
use libfuzzer_sys::fuzz_target;

/// Fuzz PURL normalization.
///
/// Any identifier that normalizes must render to a PURL that normalizes
/// back to the same identifier.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let normalizer = IdentifierNormalizer::new();
        if let Ok(id) = normalizer.normalize_purl(s) {
            let rendered = id.to_string();
            let again = normalizer
                .normalize_purl(&rendered)
                .unwrap_or_else(|e| panic!("{rendered} from {s:?} does not parse: {e}"));
            assert_eq!(again, id, "normalization of {s:?} is not idempotent");
        }
    }
});
