//! Elementary cycle enumeration over an adjacency map.
//!
//! # Algorithm
//!
//! ```text
//! white = every node (keys and successors)
//! while white is not empty:
//!     start = smallest white node
//!     DFS(start) with an explicit stack of Enter/Exit frames:
//!       Enter(n): n becomes provisionally black, leaves white, joins the path
//!                 for each successor s:
//!                   s on path      -> cycle = path[pos(s)..], rotated to max
//!                   s not black    -> push Exit(s), Enter(s)
//!       Exit(n):  n leaves the path
//!     provisionally black nodes become black
//! ```
//!
//! There is no grey state. A node reached twice from the same start is
//! simply entered again, so diamonds are explored along every path while
//! nodes finished under an earlier start are never revisited.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::Hash;

/// Directed graph as `node -> successors`.
pub type AdjacencyMap<T> = HashMap<T, HashSet<T>>;

/// Finds all elementary cycles of a directed graph.
///
/// # Example
///
/// ```rust
/// use concord_hierarchy::CycleDetection;
///
/// let mut detection = CycleDetection::new();
/// detection.add_edge("A", "B");
/// detection.add_edge("B", "C");
/// detection.add_edge("C", "A");
/// assert_eq!(detection.cycles(), vec![vec!["C", "A", "B"]]);
/// ```
#[derive(Debug, Clone)]
pub struct CycleDetection<T> {
    graph: AdjacencyMap<T>,
}

impl<T: Ord + Hash + Clone> CycleDetection<T> {
    /// Create a detector over an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: HashMap::new(),
        }
    }

    /// Create a detector over an existing adjacency map.
    #[must_use]
    pub fn from_graph(graph: AdjacencyMap<T>) -> Self {
        Self { graph }
    }

    /// Add a directed edge.
    pub fn add_edge(&mut self, source: T, target: T) {
        self.graph.entry(source).or_default().insert(target);
    }

    /// Remove a directed edge. Returns whether it existed.
    pub fn remove_edge(&mut self, source: &T, target: &T) -> bool {
        self.graph
            .get_mut(source)
            .map_or(false, |succ| succ.remove(target))
    }

    /// The underlying adjacency map.
    #[must_use]
    pub fn graph(&self) -> &AdjacencyMap<T> {
        &self.graph
    }

    /// Consume the detector and return its graph.
    #[must_use]
    pub fn into_graph(self) -> AdjacencyMap<T> {
        self.graph
    }

    /// All distinct elementary cycles, each rotated to start at its maximum
    /// node, sorted. A self-loop is a one-element cycle.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<T>> {
        find_cycles(&self.graph)
    }

    /// Whether the graph has at least one cycle.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        !self.cycles().is_empty()
    }

    /// Rotate each path to its canonical form and drop duplicates.
    #[must_use]
    pub fn normalize_paths(paths: Vec<Vec<T>>) -> Vec<Vec<T>> {
        paths
            .into_iter()
            .map(normalize_path)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl<T: Ord + Hash + Clone> Default for CycleDetection<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Rotate a closed path so that it starts at its maximum element.
///
/// `[B, C, A]`, `[C, A, B]` and `[A, B, C]` all become `[C, A, B]`.
#[must_use]
pub fn normalize_path<T: Ord>(mut path: Vec<T>) -> Vec<T> {
    let max_pos = path
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(i, _)| i)
        .unwrap_or(0);
    path.rotate_left(max_pos);
    path
}

enum Frame<'a, T> {
    Enter(&'a T),
    Exit,
}

/// Path from the start node with O(1) membership and position lookup.
struct SliceableStack<'a, T> {
    items: Vec<&'a T>,
    positions: HashMap<&'a T, usize>,
}

impl<'a, T: Hash + Eq> SliceableStack<'a, T> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            positions: HashMap::new(),
        }
    }

    fn push(&mut self, node: &'a T) {
        self.positions.insert(node, self.items.len());
        self.items.push(node);
    }

    fn pop(&mut self) {
        if let Some(node) = self.items.pop() {
            self.positions.remove(node);
        }
    }

    fn contains(&self, node: &T) -> bool {
        self.positions.contains_key(node)
    }

    /// From `node` (inclusive) to the top.
    fn slice_from(&self, node: &T) -> &[&'a T] {
        match self.positions.get(node) {
            Some(&pos) => &self.items[pos..],
            None => &[],
        }
    }
}

/// Enumerate the elementary cycles of `graph`. See the module docs.
#[must_use]
pub fn find_cycles<T: Ord + Hash + Clone>(graph: &AdjacencyMap<T>) -> Vec<Vec<T>> {
    let mut white: BTreeSet<&T> = graph.keys().collect();
    white.extend(graph.values().flatten());

    let mut black: HashSet<&T> = HashSet::new();
    let mut found: BTreeSet<Vec<T>> = BTreeSet::new();

    while let Some(&start) = white.first() {
        let mut to_be_blackened: HashSet<&T> = HashSet::new();
        let mut path = SliceableStack::new();
        let mut stack = vec![Frame::Exit, Frame::Enter(start)];

        while let Some(frame) = stack.pop() {
            let node = match frame {
                Frame::Exit => {
                    path.pop();
                    continue;
                }
                Frame::Enter(node) => node,
            };
            to_be_blackened.insert(node);
            white.remove(node);
            path.push(node);

            let mut successors: Vec<&T> = graph.get(node).into_iter().flatten().collect();
            successors.sort();
            // Reverse so the smallest successor is explored first.
            for succ in successors.into_iter().rev() {
                if path.contains(succ) {
                    let cycle: Vec<T> = path.slice_from(succ).iter().map(|n| (*n).clone()).collect();
                    found.insert(normalize_path(cycle));
                } else if !black.contains(succ) {
                    stack.push(Frame::Exit);
                    stack.push(Frame::Enter(succ));
                }
            }
        }
        black.extend(to_be_blackened);
    }

    log::debug!("found {} cycles", found.len());
    found.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(edges: &[(&'static str, &'static str)]) -> CycleDetection<&'static str> {
        let mut d = CycleDetection::new();
        for &(s, t) in edges {
            d.add_edge(s, t);
        }
        d
    }

    #[test]
    fn test_three_node_ring() {
        let d = detection(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let cycles = d.cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0], vec!["C", "A", "B"]);
    }

    #[test]
    fn test_self_loop() {
        let d = detection(&[("A", "A")]);
        assert_eq!(d.cycles(), vec![vec!["A"]]);
    }

    #[test]
    fn test_acyclic_diamond() {
        let d = detection(&[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")]);
        assert!(d.cycles().is_empty());
        assert!(!d.has_cycles());
    }

    #[test]
    fn test_two_cycles_sharing_a_node() {
        let d = detection(&[("A", "B"), ("B", "A"), ("B", "C"), ("C", "B")]);
        let cycles = d.cycles();
        assert_eq!(cycles, vec![vec!["B", "A"], vec!["C", "B"]]);
    }

    #[test]
    fn test_cycles_through_diamond() {
        // A -> B -> D -> A and A -> C -> D -> A
        let d = detection(&[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D"), ("D", "A")]);
        let cycles = d.cycles();
        assert_eq!(cycles.len(), 2);
        assert!(cycles.contains(&vec!["D", "A", "B"]));
        assert!(cycles.contains(&vec!["D", "A", "C"]));
    }

    #[test]
    fn test_cycle_not_reachable_from_first_start() {
        let d = detection(&[("A", "B"), ("X", "Y"), ("Y", "X")]);
        assert_eq!(d.cycles(), vec![vec!["Y", "X"]]);
    }

    #[test]
    fn test_remove_edge_breaks_cycle() {
        let mut d = detection(&[("A", "B"), ("B", "C"), ("C", "A")]);
        assert!(d.remove_edge(&"C", &"A"));
        assert!(!d.remove_edge(&"C", &"A"));
        assert!(d.cycles().is_empty());
    }

    #[test]
    fn test_normalize_rotates_to_max() {
        assert_eq!(normalize_path(vec![2, 5, 1, 3]), vec![5, 1, 3, 2]);
        assert_eq!(normalize_path(vec![7]), vec![7]);
        assert!(normalize_path(Vec::<i32>::new()).is_empty());
        let paths = vec![vec![1, 2, 3], vec![2, 3, 1], vec![3, 1, 2]];
        assert_eq!(CycleDetection::normalize_paths(paths), vec![vec![3, 1, 2]]);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let mut d = CycleDetection::new();
        for i in 0..50_000u32 {
            d.add_edge(i, i + 1);
        }
        d.add_edge(50_000, 0);
        let cycles = d.cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 50_001);
        assert_eq!(cycles[0][0], 50_000);
    }
}
