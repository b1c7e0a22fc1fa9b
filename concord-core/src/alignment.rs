//! Alignment: a set of correspondences with URI-indexed lookup.
//!
//! Correspondences are kept in insertion order, which makes iteration (and
//! everything derived from it, such as seeded shuffles) reproducible. Three
//! indices answer the lookups the metrics need:
//!
//! | Lookup                          | Method                                  |
//! |---------------------------------|-----------------------------------------|
//! | exact `(source, target, rel)`   | [`Alignment::get_correspondence`]       |
//! | by source / by target           | [`Alignment::by_source`], [`Alignment::by_target`] |
//! | by `(source, rel)` / `(target, rel)` | [`Alignment::by_source_relation`], [`Alignment::by_target_relation`] |
//!
//! Set operations (`union`, `intersection`, `subtract`) return new alignments.
//! `retain_all`, `remove_all` and `remove_source_target` mutate in place.

use crate::correspondence::Correspondence;
use crate::error::Result;
use crate::relation::CorrespondenceRelation;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

type Key = (String, String, CorrespondenceRelation);

fn key_of(c: &Correspondence) -> Key {
    (c.source.clone(), c.target.clone(), c.relation)
}

/// A set of [`Correspondence`]s. No two entries share `(source, target, relation)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Correspondence>", into = "Vec<Correspondence>")]
pub struct Alignment {
    items: Vec<Correspondence>,
    index: HashMap<Key, usize>,
    by_source: HashMap<String, Vec<usize>>,
    by_target: HashMap<String, Vec<usize>>,
}

impl Alignment {
    /// Create an empty alignment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of correspondences.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the alignment holds no correspondence.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Correspondence> {
        self.items.iter()
    }

    /// Add a correspondence. Returns `false` (and keeps the existing entry
    /// untouched) if one with the same identity is already present.
    pub fn add(&mut self, c: Correspondence) -> bool {
        let key = key_of(&c);
        if self.index.contains_key(&key) {
            return false;
        }
        let pos = self.items.len();
        self.by_source.entry(c.source.clone()).or_default().push(pos);
        self.by_target.entry(c.target.clone()).or_default().push(pos);
        self.index.insert(key, pos);
        self.items.push(c);
        true
    }

    /// Shorthand for adding a `(source, target, relation)` triple with confidence 1.0.
    pub fn add_triple(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        relation: CorrespondenceRelation,
    ) -> bool {
        self.add(Correspondence::new(source, target).with_relation(relation))
    }

    /// Add a correspondence or, if present, overwrite its confidence and extensions.
    pub fn add_or_modify(&mut self, c: Correspondence) {
        match self.index.get(&key_of(&c)) {
            Some(&pos) => {
                let existing = &mut self.items[pos];
                existing.confidence = c.confidence;
                existing.extensions = c.extensions;
            }
            None => {
                self.add(c);
            }
        }
    }

    /// Add every correspondence of `other` that is not yet present.
    pub fn add_all<'a>(&mut self, other: impl IntoIterator<Item = &'a Correspondence>) {
        for c in other {
            self.add(c.clone());
        }
    }

    /// Whether a correspondence with the same identity is present.
    #[must_use]
    pub fn contains(&self, c: &Correspondence) -> bool {
        self.index.contains_key(&key_of(c))
    }

    /// Exact lookup by identity.
    #[must_use]
    pub fn get_correspondence(
        &self,
        source: &str,
        target: &str,
        relation: CorrespondenceRelation,
    ) -> Option<&Correspondence> {
        self.index
            .get(&(source.to_string(), target.to_string(), relation))
            .map(|&pos| &self.items[pos])
    }

    /// All correspondences whose source is `source`.
    pub fn by_source<'a>(&'a self, source: &str) -> impl Iterator<Item = &'a Correspondence> + 'a {
        self.positions(&self.by_source, source)
    }

    /// All correspondences whose target is `target`.
    pub fn by_target<'a>(&'a self, target: &str) -> impl Iterator<Item = &'a Correspondence> + 'a {
        self.positions(&self.by_target, target)
    }

    /// Correspondences with the given source and relation.
    pub fn by_source_relation<'a>(
        &'a self,
        source: &str,
        relation: CorrespondenceRelation,
    ) -> impl Iterator<Item = &'a Correspondence> + 'a {
        self.by_source(source).filter(move |c| c.relation == relation)
    }

    /// Correspondences with the given target and relation.
    pub fn by_target_relation<'a>(
        &'a self,
        target: &str,
        relation: CorrespondenceRelation,
    ) -> impl Iterator<Item = &'a Correspondence> + 'a {
        self.by_target(target).filter(move |c| c.relation == relation)
    }

    /// Correspondences between `source` and `target`, any relation.
    pub fn by_source_target<'a>(
        &'a self,
        source: &'a str,
        target: &'a str,
    ) -> impl Iterator<Item = &'a Correspondence> + 'a {
        self.by_source(source).filter(move |c| c.target == target)
    }

    fn positions<'a>(
        &'a self,
        map: &'a HashMap<String, Vec<usize>>,
        uri: &str,
    ) -> impl Iterator<Item = &'a Correspondence> + 'a {
        map.get(uri)
            .into_iter()
            .flat_map(|v| v.iter())
            .map(move |&pos| &self.items[pos])
    }

    /// Remove one correspondence by identity. Linear in the alignment size;
    /// batch removals go through [`Alignment::remove_all`] or [`Alignment::retain`].
    pub fn remove(&mut self, c: &Correspondence) -> Option<Correspondence> {
        let pos = *self.index.get(&key_of(c))?;
        let removed = self.items.remove(pos);
        self.reindex();
        Some(removed)
    }

    /// Remove every correspondence between `source` and `target`, whatever the
    /// relation. Mutates in place; returns the number removed.
    pub fn remove_source_target(&mut self, source: &str, target: &str) -> usize {
        self.retain(|c| !(c.source == source && c.target == target))
    }

    /// Keep only correspondences matching `keep`. Mutates in place; returns
    /// the number removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&Correspondence) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|c| keep(c));
        let removed = before - self.items.len();
        if removed > 0 {
            self.reindex();
        }
        removed
    }

    /// Keep only correspondences that are also in `other`. Mutates in place.
    pub fn retain_all(&mut self, other: &Alignment) -> usize {
        self.retain(|c| other.contains(c))
    }

    /// Remove every correspondence that is also in `other`. Mutates in place.
    pub fn remove_all(&mut self, other: &Alignment) -> usize {
        self.retain(|c| !other.contains(c))
    }

    fn reindex(&mut self) {
        self.index.clear();
        self.by_source.clear();
        self.by_target.clear();
        for (pos, c) in self.items.iter().enumerate() {
            self.index.insert(key_of(c), pos);
            self.by_source.entry(c.source.clone()).or_default().push(pos);
            self.by_target.entry(c.target.clone()).or_default().push(pos);
        }
    }

    /// Distinct source URIs, sorted.
    #[must_use]
    pub fn distinct_sources(&self) -> BTreeSet<&str> {
        self.by_source.keys().map(String::as_str).collect()
    }

    /// Distinct target URIs, sorted.
    #[must_use]
    pub fn distinct_targets(&self) -> BTreeSet<&str> {
        self.by_target.keys().map(String::as_str).collect()
    }

    /// Distinct relations used.
    #[must_use]
    pub fn distinct_relations(&self) -> BTreeSet<CorrespondenceRelation> {
        self.items.iter().map(|c| c.relation).collect()
    }

    /// New alignment with the correspondences of both (entries of `self` win).
    #[must_use]
    pub fn union(&self, other: &Alignment) -> Alignment {
        let mut out = self.clone();
        out.add_all(other);
        out
    }

    /// New alignment with the correspondences present in both.
    #[must_use]
    pub fn intersection(&self, other: &Alignment) -> Alignment {
        self.iter().filter(|c| other.contains(c)).cloned().collect()
    }

    /// New alignment with the correspondences of `self` not in `other`.
    #[must_use]
    pub fn subtract(&self, other: &Alignment) -> Alignment {
        self.iter().filter(|c| !other.contains(c)).cloned().collect()
    }

    /// New alignment keeping correspondences with `confidence >= threshold`.
    #[must_use]
    pub fn cut(&self, threshold: f64) -> Alignment {
        self.iter()
            .filter(|c| c.confidence >= threshold)
            .cloned()
            .collect()
    }

    /// New alignment restricted to one relation.
    #[must_use]
    pub fn with_relation_only(&self, relation: CorrespondenceRelation) -> Alignment {
        self.iter().filter(|c| c.relation == relation).cloned().collect()
    }

    /// New alignment with every correspondence reversed (source and target swapped).
    #[must_use]
    pub fn reverse(&self) -> Alignment {
        self.iter().map(Correspondence::reverse).collect()
    }

    /// Parse from a JSON array of correspondences.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl PartialEq for Alignment {
    /// Set equality on identities.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|c| other.contains(c))
    }
}

impl Eq for Alignment {}

impl FromIterator<Correspondence> for Alignment {
    fn from_iter<I: IntoIterator<Item = Correspondence>>(iter: I) -> Self {
        let mut a = Alignment::new();
        a.extend(iter);
        a
    }
}

impl Extend<Correspondence> for Alignment {
    fn extend<I: IntoIterator<Item = Correspondence>>(&mut self, iter: I) {
        for c in iter {
            self.add(c);
        }
    }
}

impl<'a> IntoIterator for &'a Alignment {
    type Item = &'a Correspondence;
    type IntoIter = std::slice::Iter<'a, Correspondence>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for Alignment {
    type Item = Correspondence;
    type IntoIter = std::vec::IntoIter<Correspondence>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl From<Vec<Correspondence>> for Alignment {
    fn from(v: Vec<Correspondence>) -> Self {
        v.into_iter().collect()
    }
}

impl From<Alignment> for Vec<Correspondence> {
    fn from(a: Alignment) -> Self {
        a.items
    }
}
