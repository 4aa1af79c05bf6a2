//! Roll per-scenario metrics up into summaries.
//!
//! Headline precision/recall/F1 are recomputed from summed counts, so a
//! scenario with 100 packages weighs more than one with 2. The per-scenario
//! mean and median are carried alongside as descriptive values only.

use super::{MatchCounts, ScenarioMetrics};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Precision/recall/F1 triple used for descriptive statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricTriple {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

/// Aggregate over a group of scenario metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    /// Number of scenarios aggregated
    pub scenarios: usize,
    #[serde(flatten)]
    pub counts: MatchCounts,
    /// Precision of the summed counts
    pub precision: f64,
    /// Recall of the summed counts
    pub recall: f64,
    /// F1 of the summed precision and recall
    pub f1_score: f64,
    /// Unweighted per-scenario mean (0.0 when empty)
    pub mean: MetricTriple,
    /// Per-scenario median (0.0 when empty)
    pub median: MetricTriple,
}

impl SummaryMetrics {
    /// Summarize any collection of scenario metrics
    pub fn from_metrics<'a>(metrics: impl IntoIterator<Item = &'a ScenarioMetrics>) -> Self {
        let mut counts = MatchCounts::default();
        let mut precision = Vec::new();
        let mut recall = Vec::new();
        let mut f1 = Vec::new();

        for m in metrics {
            counts += m.counts;
            precision.push(m.precision);
            recall.push(m.recall);
            f1.push(m.f1_score);
        }

        for values in [&mut precision, &mut recall, &mut f1] {
            values.sort_by(f64::total_cmp);
        }

        Self {
            scenarios: precision.len(),
            counts,
            precision: counts.precision(),
            recall: counts.recall(),
            f1_score: counts.f1_score(),
            mean: MetricTriple {
                precision: mean(&precision),
                recall: mean(&recall),
                f1_score: mean(&f1),
            },
            median: MetricTriple {
                precision: median(&precision),
                recall: median(&recall),
                f1_score: median(&f1),
            },
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.scenarios == 0
    }
}

/// Mean of sorted values; summing in sorted order keeps it order-independent
#[allow(clippy::cast_precision_loss)]
fn mean(sorted: &[f64]) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.iter().sum::<f64>() / sorted.len() as f64
}

fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    match n {
        0 => 0.0,
        _ if n % 2 == 1 => sorted[n / 2],
        _ => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}

/// Group metrics by a caller-supplied key and summarize each group.
pub fn aggregate<'a, K, I, F>(metrics: I, key_fn: F) -> BTreeMap<K, SummaryMetrics>
where
    K: Ord,
    I: IntoIterator<Item = &'a ScenarioMetrics>,
    F: Fn(&ScenarioMetrics) -> K,
{
    let mut groups: BTreeMap<K, Vec<&ScenarioMetrics>> = BTreeMap::new();
    for m in metrics {
        groups.entry(key_fn(m)).or_default().push(m);
    }
    groups
        .into_iter()
        .map(|(k, group)| (k, SummaryMetrics::from_metrics(group)))
        .collect()
}

/// One global summary over everything
pub fn aggregate_all<'a>(metrics: impl IntoIterator<Item = &'a ScenarioMetrics>) -> SummaryMetrics {
    SummaryMetrics::from_metrics(metrics)
}
