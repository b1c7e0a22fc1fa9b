//! Node ranks used to decide which edge of a cycle to break.
//!
//! A rank assigns each node an integer level such that edges mostly point
//! from lower to higher ranks. The rank difference `rank[src] - rank[tgt]`
//! of an edge then measures how strongly it goes against the hierarchy.

use crate::cycles::AdjacencyMap;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{depth_first_search, DfsEvent};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::Hash;

/// Computes a rank per node of a directed graph.
pub trait HierarchyRanker<T> {
    /// Rank of every node in `graph` (keys and successors).
    fn compute_ranks(&self, graph: &AdjacencyMap<T>) -> HashMap<T, i64>;
}

/// Any `Fn(&AdjacencyMap<T>) -> HashMap<T, i64>` is a ranker.
impl<T, F> HierarchyRanker<T> for F
where
    F: Fn(&AdjacencyMap<T>) -> HashMap<T, i64>,
{
    fn compute_ranks(&self, graph: &AdjacencyMap<T>) -> HashMap<T, i64> {
        self(graph)
    }
}

/// Longest-path depth after dropping DFS back edges.
///
/// 1. Depth-first search from every node in ascending order; back edges are
///    recorded.
/// 2. Without back edges the graph is a DAG; it is sorted topologically.
/// 3. `rank[v] = max(rank[u] + 1)` over remaining edges `u -> v`, roots get 0.
///
/// Back edges therefore always have a positive rank difference and all other
/// edges a negative one.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthRanker;

impl DepthRanker {
    /// Create the ranker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl<T: Ord + Hash + Clone> HierarchyRanker<T> for DepthRanker {
    fn compute_ranks(&self, graph: &AdjacencyMap<T>) -> HashMap<T, i64> {
        let mut nodes: BTreeSet<&T> = graph.keys().collect();
        nodes.extend(graph.values().flatten());

        let mut g: DiGraph<&T, ()> = DiGraph::with_capacity(nodes.len(), 0);
        let index: HashMap<&T, NodeIndex> = nodes.iter().map(|&n| (n, g.add_node(n))).collect();
        for &n in &nodes {
            let mut succ: Vec<&T> = graph.get(n).into_iter().flatten().collect();
            succ.sort();
            for s in succ {
                g.add_edge(index[n], index[s], ());
            }
        }

        let mut back_edges: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();
        depth_first_search(&g, g.node_indices(), |event| {
            if let DfsEvent::BackEdge(u, v) = event {
                back_edges.insert((u, v));
            }
        });

        let mut dag = g.clone();
        dag.retain_edges(|frozen, e| {
            frozen
                .edge_endpoints(e)
                .map_or(true, |endpoints| !back_edges.contains(&endpoints))
        });

        let order = match toposort(&dag, None) {
            Ok(order) => order,
            Err(cycle) => {
                log::warn!(
                    "graph still cyclic after dropping back edges (at node {:?}); using flat ranks",
                    cycle.node_id()
                );
                return nodes.into_iter().map(|n| (n.clone(), 0)).collect();
            }
        };

        let mut rank: HashMap<NodeIndex, i64> = HashMap::with_capacity(order.len());
        for v in order {
            let level = dag
                .neighbors_directed(v, petgraph::Direction::Incoming)
                .filter_map(|u| rank.get(&u))
                .map(|r| r + 1)
                .max()
                .unwrap_or(0);
            rank.insert(v, level);
        }

        rank.into_iter().map(|(i, r)| (g[i].clone(), r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&'static str, &'static str)]) -> AdjacencyMap<&'static str> {
        let mut g = AdjacencyMap::new();
        for &(s, t) in edges {
            g.entry(s).or_insert_with(HashSet::new).insert(t);
        }
        g
    }

    #[test]
    fn test_chain_ranks() {
        let ranks = DepthRanker::new().compute_ranks(&graph(&[("A", "B"), ("B", "C")]));
        assert_eq!(ranks["A"], 0);
        assert_eq!(ranks["B"], 1);
        assert_eq!(ranks["C"], 2);
    }

    #[test]
    fn test_back_edge_has_positive_difference() {
        let ranks = DepthRanker::new().compute_ranks(&graph(&[("A", "B"), ("B", "C"), ("C", "A")]));
        assert!(ranks["C"] - ranks["A"] > 0);
        assert!(ranks["A"] - ranks["B"] < 0);
    }

    #[test]
    fn test_longest_path_wins() {
        let ranks = DepthRanker::new()
            .compute_ranks(&graph(&[("A", "B"), ("B", "C"), ("A", "C")]));
        assert_eq!(ranks["C"], 2);
    }

    #[test]
    fn test_closure_ranker() {
        let flat = |g: &AdjacencyMap<&'static str>| -> HashMap<&'static str, i64> {
            g.keys().map(|k| (*k, 7)).collect()
        };
        let ranks = flat.compute_ranks(&graph(&[("A", "B")]));
        assert_eq!(ranks["A"], 7);
    }
}
