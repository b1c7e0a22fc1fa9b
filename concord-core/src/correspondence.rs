//! A single link between a source entity and a target entity.

use crate::relation::CorrespondenceRelation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

/// One proposed (or gold) link between two ontology entities.
///
/// Identity is `(source, target, relation)`: two correspondences that only
/// differ in confidence or extensions are equal and hash the same, so a
/// set of correspondences never holds both.
///
/// # Example
///
/// ```rust
/// use concord_core::{Correspondence, CorrespondenceRelation};
///
/// let c = Correspondence::new("http://a#Person", "http://b#Human")
///     .with_confidence(0.8);
/// assert_eq!(c.relation, CorrespondenceRelation::Equivalence);
/// assert_eq!(c, Correspondence::new("http://a#Person", "http://b#Human"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Correspondence {
    /// URI of the entity in the source ontology (entity one).
    pub source: String,
    /// URI of the entity in the target ontology (entity two).
    pub target: String,
    /// Relation from source to target.
    #[serde(default)]
    pub relation: CorrespondenceRelation,
    /// Confidence in `[0, 1]`.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Free-form metadata keyed by extension URI or name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

fn default_confidence() -> f64 {
    1.0
}

impl Correspondence {
    /// Create an equivalence correspondence with confidence 1.0.
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation: CorrespondenceRelation::Equivalence,
            confidence: 1.0,
            extensions: BTreeMap::new(),
        }
    }

    /// Set the relation.
    #[must_use]
    pub fn with_relation(mut self, relation: CorrespondenceRelation) -> Self {
        self.relation = relation;
        self
    }

    /// Set the confidence.
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Attach an extension value.
    #[must_use]
    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    /// Change the confidence. Does not touch identity.
    pub fn set_confidence(&mut self, confidence: f64) {
        self.confidence = confidence;
    }

    /// Swap source and target and reverse the relation.
    #[must_use]
    pub fn reverse(&self) -> Self {
        Self {
            source: self.target.clone(),
            target: self.source.clone(),
            relation: self.relation.reverse(),
            confidence: self.confidence,
            extensions: self.extensions.clone(),
        }
    }

    /// Identity key `(source, target, relation)`.
    #[inline]
    #[must_use]
    pub fn key(&self) -> (&str, &str, CorrespondenceRelation) {
        (&self.source, &self.target, self.relation)
    }
}

impl PartialEq for Correspondence {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Correspondence {}

impl Hash for Correspondence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.target.hash(state);
        self.relation.hash(state);
    }
}

impl std::fmt::Display for Correspondence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<{}> {} <{}> ({:.4})",
            self.source, self.relation, self.target, self.confidence
        )
    }
}
