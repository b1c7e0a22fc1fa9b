//! Transitive closure of an alignment over both class hierarchies.
//!
//! Alignment and ontologies are merged into one "is subclass of" graph:
//!
//! | Input | Edges |
//! |-------|-------|
//! | `EQUIVALENCE(a, b)` | `a → b`, `b → a` |
//! | `SUBSUME(a, b)` (a is broader) | `b → a` |
//! | `SUBSUMED(a, b)` (a is narrower) | `a → b` |
//! | `s rdfs:subClassOf o` | `s → o` |
//! | `s owl:equivalentClass o` | `s → o`, `o → s` |
//!
//! Every node reachable from a source class that lives in the target ontology
//! is one of its superclasses there, giving `SUBSUMED(source, target)`;
//! symmetrically for target classes, giving `SUBSUME(source, target)`. Pairs
//! inferred in both directions become `EQUIVALENCE`.

use super::Refiner;
use crate::eval::ExecutionResult;
use concord_core::ontology::vocab::{OWL_EQUIVALENT_CLASS, RDFS_SUB_CLASS_OF};
use concord_core::{Alignment, CorrespondenceRelation, Ontology};
use concord_hierarchy::AdjacencyMap;
use std::collections::{HashSet, VecDeque};

/// Refines system and reference alignments with [`refine_alignment`].
///
/// Needs the source and target ontologies on the execution result; without
/// them the result passes through unchanged (with a warning).
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosureRefiner;

impl ClosureRefiner {
    /// Create the refiner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Refiner for ClosureRefiner {
    fn name(&self) -> String {
        "closure".to_string()
    }

    fn refine(&self, result: &ExecutionResult) -> ExecutionResult {
        match (result.source_ontology(), result.target_ontology()) {
            (Some(source), Some(target)) => {
                let system = refine_alignment(source, target, &result.system);
                let reference = refine_alignment(source, target, &result.reference);
                result.refined(self.name(), system, reference)
            }
            _ => {
                log::warn!("Closure refinement needs source and target ontologies; leaving alignments unchanged");
                result.refined(self.name(), result.system.clone(), result.reference.clone())
            }
        }
    }
}

/// The alignment plus every subsumption and equivalence implied by it and
/// the two ontologies. Original correspondences are kept as they are.
#[must_use]
pub fn refine_alignment<S, T>(source: &S, target: &T, alignment: &Alignment) -> Alignment
where
    S: Ontology + ?Sized,
    T: Ontology + ?Sized,
{
    let mut graph: AdjacencyMap<String> = AdjacencyMap::new();
    let mut link = |from: &str, to: &str| {
        graph.entry(from.to_string()).or_default().insert(to.to_string());
    };

    for c in alignment {
        match c.relation {
            CorrespondenceRelation::Equivalence => {
                link(&c.source, &c.target);
                link(&c.target, &c.source);
            }
            CorrespondenceRelation::Subsume => link(&c.target, &c.source),
            CorrespondenceRelation::Subsumed => link(&c.source, &c.target),
            _ => {}
        }
        if !source.contains_resource(&c.source) {
            log::warn!("Source entity of correspondence not found in source ontology: {}", c.source);
        }
        if !target.contains_resource(&c.target) {
            log::warn!("Target entity of correspondence not found in target ontology: {}", c.target);
        }
    }
    add_hierarchy(source, &mut link);
    add_hierarchy(target, &mut link);

    let mut inferred = alignment.clone();
    let mut starts: Vec<&String> = graph.keys().collect();
    starts.sort();

    for start in starts {
        let start_in_source = source.contains_resource(start);
        let start_in_target = target.contains_resource(start);
        if !start_in_source && !start_in_target {
            log::warn!("{} appears in neither source nor target ontology; skipping", start);
            continue;
        }
        for reachable in reachable_from(&graph, start) {
            let reachable_in_source = source.contains_resource(reachable);
            let reachable_in_target = target.contains_resource(reachable);
            if !reachable_in_source && !reachable_in_target {
                log::warn!("{} appears in neither source nor target ontology; skipping", reachable);
                continue;
            }
            if start_in_source && reachable_in_target {
                inferred.add_triple(start.as_str(), reachable, CorrespondenceRelation::Subsumed);
            }
            if reachable_in_source && start_in_target {
                inferred.add_triple(reachable, start.as_str(), CorrespondenceRelation::Subsume);
            }
        }
    }

    let reciprocal: Vec<(String, String)> = inferred
        .iter()
        .filter(|c| c.relation == CorrespondenceRelation::Subsume)
        .filter(|c| {
            inferred
                .get_correspondence(&c.source, &c.target, CorrespondenceRelation::Subsumed)
                .is_some()
        })
        .map(|c| (c.source.clone(), c.target.clone()))
        .collect();
    for (s, t) in reciprocal {
        inferred.add_triple(s, t, CorrespondenceRelation::Equivalence);
    }
    inferred
}

fn add_hierarchy<O: Ontology + ?Sized>(ontology: &O, link: &mut impl FnMut(&str, &str)) {
    for (sub, sup) in ontology.resource_statements(RDFS_SUB_CLASS_OF) {
        link(sub, sup);
    }
    for (left, right) in ontology.resource_statements(OWL_EQUIVALENT_CLASS) {
        link(left, right);
        link(right, left);
    }
}

/// Breadth-first reachability, excluding `start`. Sorted for stable output.
fn reachable_from<'g>(graph: &'g AdjacencyMap<String>, start: &str) -> Vec<&'g str> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    let mut out = Vec::new();
    visited.insert(start);
    queue.push_back(start);
    while let Some(current) = queue.pop_front() {
        let Some(successors) = graph.get(current) else {
            continue;
        };
        for next in successors {
            if visited.insert(next.as_str()) {
                out.push(next.as_str());
                queue.push_back(next.as_str());
            }
        }
    }
    out.sort_unstable();
    out
}
