//! # concord-hierarchy
//!
//! Utilities for directed class hierarchies that are supposed to be acyclic
//! but in practice (merged ontologies, inferred alignments) are not.
//!
//! - [`CycleDetection`]: enumerate elementary cycles with an explicit-stack DFS
//! - [`CycleRemoval`]: delete one edge per cycle, picking the edge that goes
//!   most against a node ranking
//! - [`HierarchyRanker`]: source of that ranking, with [`DepthRanker`] as the
//!   built-in implementation
//!
//! Graphs are plain adjacency maps (`HashMap<T, HashSet<T>>`); node types
//! only need `Ord + Hash + Clone`.
//!
//! ```rust
//! use concord_hierarchy::{CycleDetection, CycleRemoval};
//!
//! let mut detection = CycleDetection::new();
//! detection.add_edge("Animal", "Dog");
//! detection.add_edge("Dog", "Animal");
//! assert_eq!(detection.cycles().len(), 1);
//!
//! let acyclic = CycleRemoval::from_graph(detection.into_graph()).cycle_free_graph();
//! assert!(CycleDetection::from_graph(acyclic).cycles().is_empty());
//! ```

#![warn(missing_docs)]

pub mod cycles;
pub mod rank;
pub mod removal;

pub use cycles::{find_cycles, normalize_path, AdjacencyMap, CycleDetection};
pub use rank::{DepthRanker, HierarchyRanker};
pub use removal::{cycle_free_graph, CycleRemoval};
