//! Property tests for cycle detection and removal.
//!
//! Graphs are kept small: detection explores every simple path from each
//! start node, which grows quickly on dense graphs.

use concord_hierarchy::{normalize_path, AdjacencyMap, CycleDetection, CycleRemoval};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

fn build(edges: &[(u8, u8)]) -> AdjacencyMap<u8> {
    let mut g: AdjacencyMap<u8> = HashMap::new();
    for &(s, t) in edges {
        g.entry(s).or_default().insert(t);
    }
    g
}

fn edges_strategy() -> impl Strategy<Value = Vec<(u8, u8)>> {
    prop::collection::vec((0u8..6, 0u8..6), 0..14)
}

proptest! {
    #[test]
    fn removal_leaves_no_cycles(edges in edges_strategy()) {
        let graph = build(&edges);
        let acyclic = CycleRemoval::from_graph(graph).cycle_free_graph();
        prop_assert!(CycleDetection::from_graph(acyclic).cycles().is_empty());
    }

    #[test]
    fn removal_with_arbitrary_ranks_leaves_no_cycles(
        edges in edges_strategy(),
        ranks in prop::collection::vec(-5i64..5, 6),
    ) {
        let graph = build(&edges);
        let rank_map: HashMap<u8, i64> = ranks.iter().enumerate().map(|(i, r)| (i as u8, *r)).collect();
        let acyclic = CycleRemoval::from_graph(graph).with_ranks(rank_map).cycle_free_graph();
        prop_assert!(CycleDetection::from_graph(acyclic).cycles().is_empty());
    }

    #[test]
    fn removal_only_deletes_existing_edges(edges in edges_strategy()) {
        let graph = build(&edges);
        let removal = CycleRemoval::from_graph(graph.clone());
        for (s, t) in removal.edges_to_remove() {
            prop_assert!(graph[&s].contains(&t));
        }
    }

    #[test]
    fn detected_cycles_are_elementary_and_canonical(edges in edges_strategy()) {
        let graph = build(&edges);
        for cycle in CycleDetection::from_graph(graph.clone()).cycles() {
            prop_assert!(!cycle.is_empty());
            let distinct: HashSet<_> = cycle.iter().collect();
            prop_assert_eq!(distinct.len(), cycle.len());
            prop_assert_eq!(cycle[0], *cycle.iter().max().unwrap());
            for i in 0..cycle.len() {
                let s = cycle[i];
                let t = cycle[(i + 1) % cycle.len()];
                prop_assert!(graph[&s].contains(&t), "missing edge {} -> {}", s, t);
            }
        }
    }

    #[test]
    fn normalization_is_rotation_invariant(path in prop::collection::vec(0u32..100, 1..8), shift in 0usize..8) {
        let mut unique: Vec<u32> = Vec::new();
        for p in path {
            if !unique.contains(&p) {
                unique.push(p);
            }
        }
        let mut rotated = unique.clone();
        let len = rotated.len();
        rotated.rotate_left(shift % len);
        prop_assert_eq!(normalize_path(unique), normalize_path(rotated));
    }
}

#[test]
fn ring_and_self_loop() {
    let ring = build(&[(1, 2), (2, 3), (3, 1)]);
    assert_eq!(CycleDetection::from_graph(ring).cycles(), vec![vec![3, 1, 2]]);

    let self_loop = build(&[(1, 1)]);
    assert_eq!(CycleDetection::from_graph(self_loop).cycles(), vec![vec![1]]);
}
