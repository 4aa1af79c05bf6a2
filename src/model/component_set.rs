//! Deduplicated, ordered sets of canonical identifiers.

use super::ComponentIdentifier;
use serde::{Deserialize, Serialize};
use std::collections::btree_set;
use std::collections::BTreeSet;

/// The unique components declared by one SBOM document.
///
/// Backed by a `BTreeSet` so iteration order, serialization and every set
/// operation result are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentSet {
    items: BTreeSet<ComponentIdentifier>,
}

impl ComponentSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an identifier, returning false if it was already present
    pub fn insert(&mut self, id: ComponentIdentifier) -> bool {
        self.items.insert(id)
    }

    #[must_use]
    pub fn contains(&self, id: &ComponentIdentifier) -> bool {
        self.items.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, ComponentIdentifier> {
        self.items.iter()
    }

    /// Elements present in both sets
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        self.items.intersection(&other.items).cloned().collect()
    }

    /// Elements of `self` that are not in `other`
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.items.difference(&other.items).cloned().collect()
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.items.union(&other.items).cloned().collect()
    }

    #[must_use]
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.items.is_disjoint(&other.items)
    }

    /// PURL strings of every member, in canonical order
    #[must_use]
    pub fn to_purls(&self) -> Vec<String> {
        self.items.iter().map(ToString::to_string).collect()
    }
}

impl FromIterator<ComponentIdentifier> for ComponentSet {
    fn from_iter<I: IntoIterator<Item = ComponentIdentifier>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl Extend<ComponentIdentifier> for ComponentSet {
    fn extend<I: IntoIterator<Item = ComponentIdentifier>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ComponentSet {
    type Item = &'a ComponentIdentifier;
    type IntoIter = btree_set::Iter<'a, ComponentIdentifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for ComponentSet {
    type Item = ComponentIdentifier;
    type IntoIter = btree_set::IntoIter<ComponentIdentifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
