//! **Accuracy benchmarking for SBOM-producing SCA tools.**
//!
//! `bom-bench` scores the Software Bills of Materials produced by software
//! composition analysis tools against ground-truth SBOMs. Every component is
//! reduced to a normalized package identifier (ecosystem, name, version), the
//! expected and actual identifier sets are compared, and the outcome is
//! reported as true positives, false positives, false negatives, precision,
//! recall and F1 score, per scenario and aggregated per tool and package
//! manager.
//!
//! ## Core Concepts & Modules
//!
//! - **[`normalize`]**: Turns package URLs (or ecosystem/name/version triples)
//!   into canonical [`ComponentIdentifier`]s so that cosmetic differences
//!   between tools never count as mismatches.
//! - **[`parsers`]**: Format-checks CycloneDX 1.4-1.6 JSON documents and
//!   extracts a [`ComponentSet`] from them.
//! - **[`registry`]**: The [`SbomAdapter`] seam. Each SCA tool, and the
//!   ground truth itself, is read through an adapter looked up by name in an
//!   [`AdapterRegistry`].
//! - **[`compare`]**: Set comparison, per-scenario metrics and aggregation.
//! - **[`benchmark`]**: Walks the on-disk scenario tree, evaluates every
//!   selected tool in parallel and persists the results.
//! - **[`reports`]**: Summary, JSON and CSV renderings of a comparison or a
//!   whole run.
//!
//! ## Comparing Two SBOMs
//!
//! ```no_run
//! use bom_bench::{compare, compute_metrics, parse_sbom, IdentifierNormalizer};
//! use bom_bench::model::ScenarioKey;
//! use bom_bench::parsers::ComponentExtractor;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let normalizer = IdentifierNormalizer::new();
//!     let extractor = ComponentExtractor::new(&normalizer);
//!
//!     let expected = extractor.extract(&parse_sbom(Path::new("expected.cdx.json"))?);
//!     let actual = extractor.extract(&parse_sbom(Path::new("actual.cdx.json"))?);
//!
//!     let result = compare(&expected.components, &actual.components);
//!     let metrics = compute_metrics(&ScenarioKey::new("syft", "uv", "demo"), &result);
//!     println!(
//!         "P={:.3} R={:.3} F1={:.3}",
//!         metrics.precision, metrics.recall, metrics.f1_score
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Running a Benchmark
//!
//! ```no_run
//! use bom_bench::{AdapterRegistry, AppConfig, BenchmarkRunner};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::default();
//!     let registry = AdapterRegistry::from_config(&config.tools)?;
//!     let run = BenchmarkRunner::new(&config, &registry)?.run()?;
//!
//!     for summary in &run.tool_summaries {
//!         println!("{}: F1={:.3}", summary.tool, summary.metrics.f1_score);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Command-Line Interface (CLI)
//!
//! This documentation is for the `bom-bench` library crate. The `bom-bench`
//! binary wraps it with `compare`, `benchmark`, `tools` and `config` commands.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Counts are converted to f64 for ratios; values are bounded in practice
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    // Doc completeness: # Errors / # Panics sections are aspirational
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    // Variable names like `expected`/`excluded` are clear in context
    clippy::similar_names
)]

pub mod benchmark;
pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod parsers;
pub mod pipeline;
pub mod registry;
pub mod reports;

// Re-export main types for convenience
pub use benchmark::{BenchmarkResult, BenchmarkRun, BenchmarkRunner, RunSummary};
pub use compare::{aggregate, aggregate_all, compare, compute_metrics, ScenarioMetrics};
pub use config::{AppConfig, ConfigError, ConfigPreset, OutputConfig, Validatable};
pub use error::{BenchError, ErrorContext, OptionContext, Result};
pub use model::{ComponentIdentifier, ComponentSet, Ecosystem, ScenarioKey, ScenarioStatus};
pub use normalize::IdentifierNormalizer;
pub use parsers::{parse_sbom, parse_sbom_str};
pub use registry::{AdapterRegistry, SbomAdapter};
pub use reports::{ReportFormat, ReportGenerator};
