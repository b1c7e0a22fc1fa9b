//! Ranking metrics averaged over source entities.
//!
//! Each distinct source URI of the reference is treated as one query: the
//! reference and the system alignment are restricted to that source, ranked
//! on their own, and the per-query results are averaged. With one correct
//! target per source this is MRR/MAP in the information-retrieval sense.

use super::execution::ExecutionResult;
use super::ranking::{RankingMetric, RankingResult, SameConfidenceRanking};
use super::Metric;
use concord_core::Alignment;

/// Per-source averaged [`RankingMetric`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RankingMetricGroup {
    metric: RankingMetric,
}

impl RankingMetricGroup {
    /// Group metric with the given tie-break; K is inferred per source.
    #[must_use]
    pub fn new(tie_break: SameConfidenceRanking) -> Self {
        Self {
            metric: RankingMetric::new(tie_break),
        }
    }

    /// Wrap a configured ranking metric.
    #[must_use]
    pub fn from_metric(metric: RankingMetric) -> Self {
        Self { metric }
    }

    /// Mean ranking scores over the reference's source entities.
    #[must_use]
    pub fn compute(&self, result: &ExecutionResult) -> RankingResult {
        self.compute_alignments(&result.system, &result.reference)
    }

    /// Mean ranking scores over the source entities of `reference`.
    #[must_use]
    pub fn compute_alignments(&self, system: &Alignment, reference: &Alignment) -> RankingResult {
        let sources = reference.distinct_sources();
        let mut total = RankingResult::zero(0);
        if sources.is_empty() {
            log::info!("Reference alignment has no source entities; grouped ranking metrics are zero");
            return total;
        }

        for source in &sources {
            let group_reference: Alignment = reference.by_source(source).cloned().collect();
            let group_system: Alignment = system.by_source(source).cloned().collect();
            let scores = self.metric.compute_alignments(&group_system, &group_reference);
            total.k_of_hits_at_k = total.k_of_hits_at_k.max(scores.k_of_hits_at_k);
            total.add_scores(&scores);
        }
        total.normalize(sources.len());
        total
    }
}

impl Metric for RankingMetricGroup {
    type Output = RankingResult;

    fn compute(&self, result: &ExecutionResult) -> RankingResult {
        RankingMetricGroup::compute(self, result)
    }
}
