//! # concord
//!
//! Evaluation of ontology matchers.
//!
//! - **Confusion matrix**: precision, recall, F-measure against complete or
//!   partial gold standards, micro/macro aggregation
//! - **Ranking**: NDCG, MAP, MRR, R-precision, HITS@K over confidence-ordered
//!   alignments, with explicit tie-break policies
//! - **Refinement**: thresholds, residual alignments, and transitive closure
//!   over both class hierarchies
//! - **Hierarchies**: cycle detection and removal (re-exported from
//!   [`concord_hierarchy`])
//!
//! ## Quick Start
//!
//! ```rust
//! use concord::{Alignment, Correspondence, ExecutionResult};
//! use concord::eval::{ConfusionMatrixMetric, RankingMetricGroup, SameConfidenceRanking};
//!
//! let reference: Alignment = vec![
//!     Correspondence::new("http://a#Person", "http://b#Human"),
//! ].into();
//! let system: Alignment = vec![
//!     Correspondence::new("http://a#Person", "http://b#Human").with_confidence(0.8),
//!     Correspondence::new("http://a#Person", "http://b#Agent").with_confidence(0.8),
//! ].into();
//! let result = ExecutionResult::new(system, reference);
//!
//! let cm = ConfusionMatrixMetric::new().compute(&result);
//! assert_eq!(cm.tp(), 1);
//! assert_eq!(cm.fp(), 1);
//!
//! // Pessimistic: correct correspondences last among equal confidences.
//! let mrr = RankingMetricGroup::new(SameConfidenceRanking::Bottom).compute(&result);
//! assert!((mrr.reciprocal_rank - 0.5).abs() < 1e-9);
//! ```
//!
//! ## Crates
//!
//! | Crate | Contents |
//! |-------|----------|
//! | `concord-core` | [`Alignment`], [`Correspondence`], [`CorrespondenceRelation`], [`Ontology`] |
//! | `concord-hierarchy` | [`CycleDetection`], [`CycleRemoval`], rankers |
//! | `concord` | metrics ([`eval`]), refiners ([`refine`]), CLI modules |
//!
//! ## Feature Flags
//!
//! | Feature | Effect |
//! |---------|--------|
//! | `cli` (default) | argument parsing, output formatting and config files for the `concord` binary |
//! | `eval-parallel` | [`ConfusionMatrixMetric::compute_all`](eval::ConfusionMatrixMetric::compute_all) uses rayon |

#![warn(missing_docs)]

pub mod error;
pub mod eval;
pub mod refine;

#[cfg(feature = "cli")]
pub mod cli;

pub use concord_core::{
    Alignment, Correspondence, CorrespondenceRelation, Ontology, ResourceType, TripleOntology,
};
pub use concord_hierarchy::{CycleDetection, CycleRemoval, DepthRanker, HierarchyRanker};
pub use error::{Error, Result};
pub use eval::{ExecutionResult, Metric};
pub use refine::Refiner;

/// Hierarchy utilities.
pub mod hierarchy {
    pub use concord_hierarchy::*;
}
