//! Precision, recall and F1 from match counts.
//!
//! Zero denominators never produce NaN:
//! - precision is 1.0 when nothing was reported (TP + FP = 0)
//! - recall is 1.0 when nothing was expected (TP + FN = 0)
//! - F1 is 0.0 when precision + recall = 0

use super::ComparisonResult;
use crate::model::ScenarioKey;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// TP/FP/FN counts of one comparison, or the sum over many.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl MatchCounts {
    #[must_use]
    pub const fn new(true_positives: usize, false_positives: usize, false_negatives: usize) -> Self {
        Self {
            true_positives,
            false_positives,
            false_negatives,
        }
    }

    /// Size of the expected set (TP + FN)
    #[must_use]
    pub const fn expected_total(&self) -> usize {
        self.true_positives + self.false_negatives
    }

    /// Size of the actual set (TP + FP)
    #[must_use]
    pub const fn actual_total(&self) -> usize {
        self.true_positives + self.false_positives
    }

    #[must_use]
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.actual_total())
    }

    #[must_use]
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.expected_total())
    }

    #[must_use]
    pub fn f1_score(&self) -> f64 {
        f1(self.precision(), self.recall())
    }
}

impl Add for MatchCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            true_positives: self.true_positives + rhs.true_positives,
            false_positives: self.false_positives + rhs.false_positives,
            false_negatives: self.false_negatives + rhs.false_negatives,
        }
    }
}

impl AddAssign for MatchCounts {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for MatchCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl<'a> Sum<&'a Self> for MatchCounts {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        1.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Harmonic mean of precision and recall
#[must_use]
pub fn f1(precision: f64, recall: f64) -> f64 {
    let sum = precision + recall;
    if sum <= 0.0 {
        0.0
    } else {
        2.0 * precision * recall / sum
    }
}

/// Quality metrics of one tool on one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMetrics {
    #[serde(flatten)]
    pub key: ScenarioKey,
    #[serde(flatten)]
    pub counts: MatchCounts,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

impl ScenarioMetrics {
    pub fn from_counts(key: ScenarioKey, counts: MatchCounts) -> Self {
        Self {
            key,
            counts,
            precision: counts.precision(),
            recall: counts.recall(),
            f1_score: counts.f1_score(),
        }
    }
}

/// Derive scenario metrics from a comparison
pub fn compute_metrics(key: &ScenarioKey, result: &ComparisonResult) -> ScenarioMetrics {
    ScenarioMetrics::from_counts(key.clone(), result.counts())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ScenarioKey {
        ScenarioKey::new("syft", "uv", "simple")
    }

    #[test]
    fn test_half_and_half() {
        let m = ScenarioMetrics::from_counts(key(), MatchCounts::new(1, 1, 1));
        assert!((m.precision - 0.5).abs() < f64::EPSILON);
        assert!((m.recall - 0.5).abs() < f64::EPSILON);
        assert!((m.f1_score - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_both_empty_is_perfect() {
        let m = ScenarioMetrics::from_counts(key(), MatchCounts::default());
        assert_eq!((m.precision, m.recall, m.f1_score), (1.0, 1.0, 1.0));
    }

    #[test]
    fn test_actual_empty() {
        let m = ScenarioMetrics::from_counts(key(), MatchCounts::new(0, 0, 1));
        assert_eq!((m.precision, m.recall, m.f1_score), (1.0, 0.0, 0.0));
    }

    #[test]
    fn test_expected_empty() {
        let m = ScenarioMetrics::from_counts(key(), MatchCounts::new(0, 3, 0));
        assert_eq!((m.precision, m.recall, m.f1_score), (0.0, 1.0, 0.0));
    }

    #[test]
    fn test_counts_sum() {
        let total: MatchCounts = [MatchCounts::new(1, 0, 9), MatchCounts::new(9, 0, 1)]
            .iter()
            .sum();
        assert_eq!(total, MatchCounts::new(10, 0, 10));
        assert!((total.recall() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_metrics_serialize_flat() {
        let m = ScenarioMetrics::from_counts(key(), MatchCounts::new(2, 0, 0));
        let value = serde_json::to_value(&m).expect("serialize");
        assert_eq!(value["tool"], "syft");
        assert_eq!(value["true_positives"], 2);
        assert_eq!(value["precision"], 1.0);
    }
}
