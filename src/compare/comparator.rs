//! Exact set comparison of expected and actual inventories.

use super::MatchCounts;
use crate::model::ComponentSet;
use serde::{Deserialize, Serialize};

/// Outcome of comparing one expected set against one actual set.
///
/// The three sets are pairwise disjoint; `true_positives ∪ false_positives`
/// is the actual set and `true_positives ∪ false_negatives` the expected one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct ComparisonResult {
    true_positives: ComponentSet,
    false_positives: ComponentSet,
    false_negatives: ComponentSet,
}

impl ComparisonResult {
    /// Components reported by the tool that are in the ground truth
    pub fn true_positives(&self) -> &ComponentSet {
        &self.true_positives
    }

    /// Components reported by the tool that are not in the ground truth
    pub fn false_positives(&self) -> &ComponentSet {
        &self.false_positives
    }

    /// Ground-truth components the tool missed
    pub fn false_negatives(&self) -> &ComponentSet {
        &self.false_negatives
    }

    pub fn counts(&self) -> MatchCounts {
        MatchCounts::new(
            self.true_positives.len(),
            self.false_positives.len(),
            self.false_negatives.len(),
        )
    }

    /// Reconstructs the expected set
    pub fn expected(&self) -> ComponentSet {
        self.true_positives.union(&self.false_negatives)
    }

    /// Reconstructs the actual set
    pub fn actual(&self) -> ComponentSet {
        self.true_positives.union(&self.false_positives)
    }

    /// True when the tool reported exactly the ground truth
    #[must_use]
    pub fn is_exact_match(&self) -> bool {
        self.false_positives.is_empty() && self.false_negatives.is_empty()
    }
}

/// Compare an actual inventory against the expected one.
///
/// Matching is exact on canonical identity; there is no fuzzy matching and
/// no version range logic.
pub fn compare(expected: &ComponentSet, actual: &ComponentSet) -> ComparisonResult {
    ComparisonResult {
        true_positives: expected.intersection(actual),
        false_positives: actual.difference(expected),
        false_negatives: expected.difference(actual),
    }
}
