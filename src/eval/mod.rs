//! Alignment evaluation.
//!
//! # Overview
//!
//! Every metric consumes an [`ExecutionResult`]: the system alignment a
//! matcher produced for one test case, the reference alignment, and optional
//! context (gold standard completeness, ontologies, exclusions).
//!
//! | Metric | Output | Question answered |
//! |--------|--------|-------------------|
//! | [`ConfusionMatrixMetric`] | [`ConfusionMatrix`] | How many correspondences are right? |
//! | [`RankingMetric`] | [`RankingResult`] | Are the right correspondences ranked first? |
//! | [`RankingMetricGroup`] | [`RankingResult`] | Same, averaged per source entity |
//! | [`MatcherSimilarityMetric`] | [`MatcherSimilarity`] | Do two matchers agree? |
//! | [`AlignmentAnalyzerMetric`] | [`AlignmentAnalyzerResult`] | What does the alignment look like? |
//!
//! # Example
//!
//! ```rust
//! use concord::eval::{ConfusionMatrixMetric, ExecutionResult, RankingMetric, SameConfidenceRanking};
//! use concord_core::{Alignment, Correspondence};
//!
//! let reference: Alignment = vec![
//!     Correspondence::new("http://a#Person", "http://b#Human"),
//!     Correspondence::new("http://a#Paper", "http://b#Article"),
//! ].into();
//! let system: Alignment = vec![
//!     Correspondence::new("http://a#Person", "http://b#Human").with_confidence(0.9),
//!     Correspondence::new("http://a#Paper", "http://b#Review").with_confidence(0.7),
//! ].into();
//! let result = ExecutionResult::new(system, reference);
//!
//! let cm = ConfusionMatrixMetric::new().compute(&result);
//! assert!((cm.precision() - 0.5).abs() < 1e-9);
//!
//! let ranking = RankingMetric::new(SameConfidenceRanking::Alphabetically).compute(&result);
//! assert!((ranking.reciprocal_rank - 1.0).abs() < 1e-9);
//! ```
//!
//! # Degenerate input
//!
//! Metrics never fail. Empty alignments and zero denominators give `0.0`
//! scores; questionable configurations are logged through the `log` facade.

pub mod analyzer;
pub mod confusion;
pub mod execution;
pub mod ranking;
pub mod ranking_group;
pub mod similarity;

pub use analyzer::{AlignmentAnalyzerMetric, AlignmentAnalyzerResult, Arity};
pub use confusion::{f_beta, AggregationMode, ConfusionMatrix, ConfusionMatrixMetric};
pub use execution::{ExecutionResult, GoldStandardCompleteness, SharedOntology};
pub use ranking::{RankingMetric, RankingResult, SameConfidenceRanking};
pub use ranking_group::RankingMetricGroup;
pub use similarity::{alignment_similarity, MatcherSimilarity, MatcherSimilarityMetric};

/// A measurement over one execution result.
pub trait Metric {
    /// What the metric produces.
    type Output;

    /// Measure `result`.
    fn compute(&self, result: &ExecutionResult) -> Self::Output;

    /// Measure each result in turn.
    fn compute_each(&self, results: &[ExecutionResult]) -> Vec<Self::Output> {
        results.iter().map(|r| self.compute(r)).collect()
    }
}
