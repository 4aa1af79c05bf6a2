//! Set comparison, scenario metrics and aggregation.
//!
//! ```
//! use bom_bench::compare::{compare, compute_metrics};
//! use bom_bench::model::{ComponentSet, ScenarioKey};
//! use bom_bench::normalize::IdentifierNormalizer;
//!
//! let normalizer = IdentifierNormalizer::new();
//! let expected: ComponentSet = ["pkg:pypi/requests@2.31.0", "pkg:pypi/urllib3@2.0.0"]
//!     .iter()
//!     .map(|p| normalizer.normalize_purl(p))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! let actual: ComponentSet = ["pkg:pypi/Requests@2.31.0", "pkg:pypi/idna@3.4"]
//!     .iter()
//!     .map(|p| normalizer.normalize_purl(p))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! let result = compare(&expected, &actual);
//! let metrics = compute_metrics(&ScenarioKey::new("syft", "uv", "demo"), &result);
//! assert_eq!(metrics.precision, 0.5);
//! assert_eq!(metrics.recall, 0.5);
//! ```

mod aggregate;
mod comparator;
mod metrics;

pub use aggregate::{aggregate, aggregate_all, MetricTriple, SummaryMetrics};
pub use comparator::{compare, ComparisonResult};
pub use metrics::{compute_metrics, f1, MatchCounts, ScenarioMetrics};
