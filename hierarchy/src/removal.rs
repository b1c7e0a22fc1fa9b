//! Break every cycle of a graph by deleting one edge per cycle.

use crate::cycles::{find_cycles, AdjacencyMap};
use crate::rank::{DepthRanker, HierarchyRanker};
use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

/// Selects and removes one edge per cycle.
///
/// For each cycle the edge with the largest rank difference
/// `rank[src] - rank[tgt]` is chosen, starting from the closing edge
/// `last -> first` and replacing it only on a strictly larger difference.
/// A cycle that already contains a selected edge is skipped.
///
/// Cycles come from [`find_cycles`] unless supplied with
/// [`with_cycles`](Self::with_cycles); ranks come from [`DepthRanker`]
/// unless supplied with [`with_ranks`](Self::with_ranks) or
/// [`with_ranker`](Self::with_ranker).
///
/// # Example
///
/// ```rust
/// use concord_hierarchy::{CycleDetection, CycleRemoval};
///
/// let mut removal = CycleRemoval::new();
/// removal.add_edge("A", "B");
/// removal.add_edge("B", "A");
/// let acyclic = removal.cycle_free_graph();
/// assert!(CycleDetection::from_graph(acyclic).cycles().is_empty());
/// ```
pub struct CycleRemoval<'r, T> {
    graph: AdjacencyMap<T>,
    cycles: Option<Vec<Vec<T>>>,
    ranks: Option<HashMap<T, i64>>,
    ranker: Option<&'r dyn HierarchyRanker<T>>,
}

impl<'r, T: Ord + Hash + Clone> CycleRemoval<'r, T> {
    /// Create a removal over an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::from_graph(AdjacencyMap::new())
    }

    /// Create a removal over `graph`.
    #[must_use]
    pub fn from_graph(graph: AdjacencyMap<T>) -> Self {
        Self {
            graph,
            cycles: None,
            ranks: None,
            ranker: None,
        }
    }

    /// Use precomputed cycles instead of running detection.
    #[must_use]
    pub fn with_cycles(mut self, cycles: Vec<Vec<T>>) -> Self {
        self.cycles = Some(cycles);
        self
    }

    /// Use fixed ranks. Nodes missing from the map rank 0.
    #[must_use]
    pub fn with_ranks(mut self, ranks: HashMap<T, i64>) -> Self {
        self.ranks = Some(ranks);
        self
    }

    /// Compute ranks with `ranker` (only when there is a cycle to break).
    #[must_use]
    pub fn with_ranker(mut self, ranker: &'r dyn HierarchyRanker<T>) -> Self {
        self.ranker = Some(ranker);
        self
    }

    /// Add a directed edge.
    pub fn add_edge(&mut self, source: T, target: T) {
        self.graph.entry(source).or_default().insert(target);
    }

    /// Remove a directed edge.
    pub fn remove_edge(&mut self, source: &T, target: &T) {
        if let Some(succ) = self.graph.get_mut(source) {
            succ.remove(target);
        }
    }

    /// The input graph.
    #[must_use]
    pub fn graph(&self) -> &AdjacencyMap<T> {
        &self.graph
    }

    /// Edges selected for removal, sorted.
    #[must_use]
    pub fn edges_to_remove(&self) -> BTreeSet<(T, T)> {
        let cycles = match &self.cycles {
            Some(c) => c.clone(),
            None => find_cycles(&self.graph),
        };
        let mut selected = BTreeSet::new();
        if cycles.is_empty() {
            return selected;
        }

        let computed;
        let ranks = match (&self.ranks, self.ranker) {
            (Some(r), _) => r,
            (None, Some(ranker)) => {
                computed = ranker.compute_ranks(&self.graph);
                &computed
            }
            (None, None) => {
                computed = DepthRanker.compute_ranks(&self.graph);
                &computed
            }
        };

        for cycle in &cycles {
            match cycle.as_slice() {
                [] => continue,
                [only] => {
                    selected.insert((only.clone(), only.clone()));
                }
                _ => select_edge(cycle, &mut selected, ranks),
            }
        }
        log::debug!(
            "breaking {} cycles by removing {} edges",
            cycles.len(),
            selected.len()
        );
        selected
    }

    /// Copy of the graph without the selected edges.
    #[must_use]
    pub fn cycle_free_graph(&self) -> AdjacencyMap<T> {
        let mut out = self.graph.clone();
        for (source, target) in self.edges_to_remove() {
            if let Some(succ) = out.get_mut(&source) {
                succ.remove(&target);
            }
        }
        out
    }
}

impl<T: Ord + Hash + Clone> Default for CycleRemoval<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

fn rank_diff<T: Hash + Eq>(source: &T, target: &T, ranks: &HashMap<T, i64>) -> i64 {
    ranks.get(source).copied().unwrap_or(0) - ranks.get(target).copied().unwrap_or(0)
}

fn select_edge<T: Ord + Hash + Clone>(
    cycle: &[T],
    selected: &mut BTreeSet<(T, T)>,
    ranks: &HashMap<T, i64>,
) {
    let last = cycle.len() - 1;
    let mut candidate = (cycle[last].clone(), cycle[0].clone());
    if selected.contains(&candidate) {
        return;
    }
    let mut best = rank_diff(&candidate.0, &candidate.1, ranks);
    for pair in cycle.windows(2) {
        let edge = (pair[0].clone(), pair[1].clone());
        if selected.contains(&edge) {
            return;
        }
        let diff = rank_diff(&edge.0, &edge.1, ranks);
        if diff > best {
            best = diff;
            candidate = edge;
        }
    }
    selected.insert(candidate);
}

/// Convenience: cycle-free copy of `graph` using detected cycles and the given ranks.
#[must_use]
pub fn cycle_free_graph<T: Ord + Hash + Clone>(
    graph: &AdjacencyMap<T>,
    cycles: Vec<Vec<T>>,
    ranks: HashMap<T, i64>,
) -> AdjacencyMap<T> {
    CycleRemoval::from_graph(graph.clone())
        .with_cycles(cycles)
        .with_ranks(ranks)
        .cycle_free_graph()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycles::CycleDetection;

    fn removal(edges: &[(&'static str, &'static str)]) -> CycleRemoval<'static, &'static str> {
        let mut r = CycleRemoval::new();
        for &(s, t) in edges {
            r.add_edge(s, t);
        }
        r
    }

    #[test]
    fn test_no_cycles_no_removal() {
        let r = removal(&[("A", "B"), ("B", "C")]);
        assert!(r.edges_to_remove().is_empty());
        assert_eq!(r.cycle_free_graph(), *r.graph());
    }

    #[test]
    fn test_self_loop_removed() {
        let r = removal(&[("A", "A"), ("A", "B")]);
        let removed: Vec<_> = r.edges_to_remove().into_iter().collect();
        assert_eq!(removed, vec![("A", "A")]);
    }

    fn lattice() -> CycleRemoval<'static, &'static str> {
        // A -> B -> C, X -> Z -> C, Y -> Z -> C, C -> Y
        removal(&[
            ("A", "B"),
            ("B", "C"),
            ("X", "Z"),
            ("Z", "C"),
            ("Y", "Z"),
            ("C", "Y"),
        ])
    }

    #[test]
    fn test_single_back_edge_with_explicit_ranks() {
        let ranks: HashMap<&str, i64> = [("A", 0), ("X", 0), ("B", 1), ("Y", 1), ("Z", 2), ("C", 3)]
            .into_iter()
            .collect();
        let removed: Vec<_> = lattice().with_ranks(ranks).edges_to_remove().into_iter().collect();
        assert_eq!(removed, vec![("C", "Y")]);
    }

    #[test]
    fn test_depth_ranks_break_the_cycle() {
        let r = lattice();
        assert_eq!(r.edges_to_remove().len(), 1);
        assert!(CycleDetection::from_graph(r.cycle_free_graph()).cycles().is_empty());
    }

    #[test]
    fn test_worst_violator_by_explicit_ranks() {
        let edges = [
            ("A", "B"),
            ("B", "C"),
            ("C", "D"),
            ("E", "B"),
            ("F", "H"),
            ("H", "C"),
            ("G", "H"),
            ("I", "K"),
            ("K", "M"),
            ("M", "D"),
            ("J", "L"),
            ("L", "M"),
            ("D", "A"),
            ("C", "H"),
        ];
        let ranks: HashMap<&str, i64> = [
            ("A", 1),
            ("E", 1),
            ("F", 1),
            ("G", 1),
            ("I", 0),
            ("J", 0),
            ("B", 2),
            ("H", 2),
            ("K", 1),
            ("L", 1),
            ("C", 3),
            ("M", 2),
            ("D", 4),
        ]
        .into_iter()
        .collect();
        let r = removal(&edges).with_ranks(ranks);
        let removed: Vec<_> = r.edges_to_remove().into_iter().collect();
        assert_eq!(removed, vec![("C", "H"), ("D", "A")]);
        assert!(CycleDetection::from_graph(r.cycle_free_graph()).cycles().is_empty());
    }

    #[test]
    fn test_shared_edge_selected_once() {
        // Both cycles contain B -> A, which has the highest rank difference.
        let ranks: HashMap<&str, i64> = [("A", 0), ("B", 5), ("C", 1)].into_iter().collect();
        let r = removal(&[("A", "B"), ("B", "A"), ("A", "C"), ("C", "B")]).with_ranks(ranks);
        let removed: Vec<_> = r.edges_to_remove().into_iter().collect();
        assert_eq!(removed, vec![("B", "A")]);
    }

    #[test]
    fn test_precomputed_cycles_are_used() {
        let r = removal(&[("A", "B"), ("B", "A")]).with_cycles(Vec::new());
        assert!(r.edges_to_remove().is_empty());
    }

    #[test]
    fn test_free_function() {
        let mut g = AdjacencyMap::new();
        g.entry(1).or_insert_with(std::collections::HashSet::new).insert(2);
        g.entry(2).or_insert_with(std::collections::HashSet::new).insert(1);
        let cycles = find_cycles(&g);
        let ranks: HashMap<i32, i64> = [(1, 0), (2, 1)].into_iter().collect();
        let out = cycle_free_graph(&g, cycles, ranks);
        assert!(out[&1].contains(&2));
        assert!(out[&2].is_empty());
    }
}
