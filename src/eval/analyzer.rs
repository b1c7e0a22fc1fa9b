//! Descriptive statistics of a system alignment.
//!
//! Answers the questions one asks first when a matcher's output looks off:
//! are the confidences meaningful, which relations and entity kinds are
//! mapped, are source and target swapped, and how many-to-many is it.

use super::execution::ExecutionResult;
use super::Metric;
use concord_core::{CorrespondenceRelation, Ontology, ResourceType};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Cardinality of the correspondences around one source entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Arity {
    /// One target that no other source maps to.
    OneToOne,
    /// Several targets, each mapped only from this source.
    OneToMany,
    /// One target shared with other sources.
    ManyToOne,
    /// Several targets, at least one shared with another source.
    ManyToMany,
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Arity::OneToOne => "1:1",
            Arity::OneToMany => "1:n",
            Arity::ManyToOne => "n:1",
            Arity::ManyToMany => "n:m",
        };
        write!(f, "{}", s)
    }
}

/// Output of [`AlignmentAnalyzerMetric`].
#[derive(Debug, Clone, Serialize)]
pub struct AlignmentAnalyzerResult {
    /// Matcher name.
    pub matcher: String,
    /// Test case name.
    pub test_case: String,
    /// Number of analyzed correspondences.
    pub number_of_correspondences: usize,
    /// Smallest confidence (1.0 for an empty alignment).
    pub minimum_confidence: f64,
    /// Largest confidence (0.0 for an empty alignment).
    pub maximum_confidence: f64,
    /// How often each relation occurs.
    pub relation_frequencies: BTreeMap<CorrespondenceRelation, usize>,
    /// How often each `"SOURCE_TYPE - TARGET_TYPE"` pair occurs.
    pub mapping_type_frequencies: BTreeMap<String, usize>,
    /// Whether every correspondence maps entities of the same type.
    pub homogeneous: bool,
    /// URIs found in the ontology matching their side.
    pub uris_correct_position: usize,
    /// URIs found only in the ontology of the other side.
    pub uris_incorrect_position: usize,
    /// URIs found in neither ontology.
    pub uris_not_found: Vec<String>,
    /// Correspondence count per arity class.
    pub arity_counts: BTreeMap<Arity, usize>,
}

impl AlignmentAnalyzerResult {
    /// Whether every confidence is exactly 1.0.
    #[must_use]
    pub fn confidences_always_one(&self) -> bool {
        self.minimum_confidence == 1.0 && self.maximum_confidence == 1.0
    }

    /// Whether equivalence is the only relation used.
    #[must_use]
    pub fn always_equivalence(&self) -> bool {
        self.relation_frequencies.len() == 1
            && self
                .relation_frequencies
                .contains_key(&CorrespondenceRelation::Equivalence)
    }

    /// Whether more URIs sit on the wrong side than on the right one.
    #[must_use]
    pub fn source_target_switch_suggested(&self) -> bool {
        self.uris_correct_position < self.uris_incorrect_position
    }

    /// Short problem summary; empty when nothing looks wrong.
    #[must_use]
    pub fn erroneous_report(&self) -> String {
        let mut out = String::new();
        if self.source_target_switch_suggested() {
            let _ = write!(out, "Need switch: {} on {}", self.matcher, self.test_case);
        }
        if !self.uris_not_found.is_empty() {
            if !out.is_empty() {
                out.push_str("; ");
            }
            let _ = write!(out, "Not found: {:?}", self.uris_not_found);
        }
        out
    }

    /// Multi-line human readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Alignment report for {} on test case {}\n",
            display_or(&self.matcher, "<unnamed matcher>"),
            display_or(&self.test_case, "<unnamed test case>")
        );
        let _ = writeln!(out, "Number of correspondences: {}\n", self.number_of_correspondences);

        if self.homogeneous {
            let _ = writeln!(out, "The mapping is homogeneous.\n");
        } else {
            let _ = writeln!(out, "The mapping is heterogeneous.\n");
        }

        let _ = writeln!(out, "Distribution of mapping types:");
        for (pair, count) in &self.mapping_type_frequencies {
            let _ = writeln!(out, "{} ({})", pair, count);
        }
        out.push('\n');

        if self.always_equivalence() {
            let _ = writeln!(out, "All correspondences are equivalence relations.\n");
        } else {
            let _ = writeln!(out, "Distribution of mapping relations:");
            for (relation, count) in &self.relation_frequencies {
                let _ = writeln!(out, "{} ({})", relation.name(), count);
            }
            out.push('\n');
        }

        if self.confidences_always_one() {
            let _ = writeln!(out, "The confidence of all correspondences is 1.0\n");
        } else {
            let _ = writeln!(out, "The minimum confidence is {:.6}", self.minimum_confidence);
            let _ = writeln!(out, "The maximum confidence is {:.6}\n", self.maximum_confidence);
        }

        if self.uris_not_found.is_empty() {
            let _ = writeln!(out, "All URIs of the alignment are found in source or target.");
        } else {
            let _ = writeln!(
                out,
                "The following URIs are found in neither source nor target: {:?}",
                self.uris_not_found
            );
        }
        let verdict = if self.source_target_switch_suggested() {
            "Swapping source and target is suggested."
        } else {
            "Source and target are in the right order."
        };
        let _ = writeln!(
            out,
            "{} URIs in correct position: {}, in incorrect position: {}\n",
            verdict, self.uris_correct_position, self.uris_incorrect_position
        );

        let _ = writeln!(out, "Arity analysis:");
        for (arity, count) in &self.arity_counts {
            let _ = writeln!(out, "{} ({})", arity, count);
        }
        out
    }
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

impl std::fmt::Display for AlignmentAnalyzerResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.report())
    }
}

/// Computes [`AlignmentAnalyzerResult`]s from a result's system alignment and ontologies.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlignmentAnalyzerMetric;

impl AlignmentAnalyzerMetric {
    /// Create the metric.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Analyze the system alignment of `result`.
    ///
    /// Without attached ontologies every entity is `UNKNOWN` and the URI
    /// position counts stay zero.
    #[must_use]
    pub fn compute(&self, result: &ExecutionResult) -> AlignmentAnalyzerResult {
        let alignment = &result.system;
        let source = result.source_ontology();
        let target = result.target_ontology();
        if source.is_none() || target.is_none() {
            log::warn!("No ontologies attached; resource types and URI positions are not analyzed");
        }

        let mut minimum_confidence: f64 = 1.0;
        let mut maximum_confidence: f64 = 0.0;
        let mut relation_frequencies = BTreeMap::new();
        let mut mapping_type_frequencies = BTreeMap::new();
        let mut homogeneous = true;
        let mut uris_correct_position = 0;
        let mut uris_incorrect_position = 0;
        let mut uris_not_found = Vec::new();
        let mut arity_counts = BTreeMap::new();

        for c in alignment {
            minimum_confidence = minimum_confidence.min(c.confidence);
            maximum_confidence = maximum_confidence.max(c.confidence);
            *relation_frequencies.entry(c.relation).or_insert(0) += 1;

            let source_type = resource_type(source, &c.source);
            let target_type = resource_type(target, &c.target);
            *mapping_type_frequencies
                .entry(format!("{} - {}", source_type, target_type))
                .or_insert(0) += 1;
            if source_type != target_type {
                homogeneous = false;
            }

            if let (Some(src), Some(tgt)) = (source, target) {
                for (uri, own, other) in [(&c.source, src, tgt), (&c.target, tgt, src)] {
                    if own.contains_resource(uri) {
                        uris_correct_position += 1;
                    } else if other.contains_resource(uri) {
                        uris_incorrect_position += 1;
                    } else {
                        uris_not_found.push(uri.clone());
                    }
                }
            }

            let targets: Vec<&str> = alignment.by_source(&c.source).map(|x| x.target.as_str()).collect();
            let shared = |t: &str| alignment.by_target(t).count() > 1;
            let arity = match (targets.len() > 1, targets.iter().any(|t| shared(t))) {
                (false, false) => Arity::OneToOne,
                (false, true) => Arity::ManyToOne,
                (true, false) => Arity::OneToMany,
                (true, true) => Arity::ManyToMany,
            };
            *arity_counts.entry(arity).or_insert(0) += 1;
        }

        AlignmentAnalyzerResult {
            matcher: result.matcher.clone(),
            test_case: result.test_case.clone(),
            number_of_correspondences: alignment.len(),
            minimum_confidence,
            maximum_confidence,
            relation_frequencies,
            mapping_type_frequencies,
            homogeneous,
            uris_correct_position,
            uris_incorrect_position,
            uris_not_found,
            arity_counts,
        }
    }
}

fn resource_type(ontology: Option<&(dyn Ontology + Send + Sync)>, uri: &str) -> ResourceType {
    ontology.map_or(ResourceType::Unknown, |o| o.resource_type(uri))
}

impl Metric for AlignmentAnalyzerMetric {
    type Output = AlignmentAnalyzerResult;

    fn compute(&self, result: &ExecutionResult) -> AlignmentAnalyzerResult {
        AlignmentAnalyzerMetric::compute(self, result)
    }
}
