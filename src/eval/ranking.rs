//! Ranking metrics over a system alignment ordered by confidence.
//!
//! The system alignment is read as a ranked list: highest confidence first,
//! ties broken by a [`SameConfidenceRanking`] policy. A position is relevant
//! when its correspondence is in the reference alignment.
//!
//! | Metric | Definition (rank = position + 1) |
//! |--------|----------------------------------|
//! | DCG | Σ over relevant ranks of `ln 2 / ln(rank + 1)` |
//! | NDCG | DCG / IDCG, IDCG computed over the *observed* list length |
//! | Average precision | mean of `tp_so_far / rank` at each relevant rank |
//! | Reciprocal rank | `1 / rank` of the first relevant entry, 0 if none |
//! | R-precision | relevant entries in the first `|reference|` ranks / `|reference|` |
//! | HITS@K | relevant entries in the first K ranks |
//! | P@K, R@K | HITS@K / K, HITS@K / `|reference|` |
//!
//! Every division by zero yields 0.0.

use super::confusion::f_beta;
use super::execution::ExecutionResult;
use super::Metric;
use concord_core::{Alignment, Correspondence};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// K used for HITS@K when it is neither configured nor inferable.
pub const DEFAULT_K: usize = 10;

/// Seed of [`SameConfidenceRanking::RandomWithSeed`] when parsed from a name.
pub const DEFAULT_SEED: u64 = 13246;

/// How correspondences with equal confidence are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SameConfidenceRanking {
    /// By source URI, then target URI.
    #[default]
    Alphabetically,
    /// Shuffled with a fresh random generator.
    Random,
    /// Shuffled with a generator seeded from the value (reproducible).
    RandomWithSeed(u64),
    /// Reference correspondences first (optimistic).
    Top,
    /// Reference correspondences last (pessimistic).
    Bottom,
}

impl SameConfidenceRanking {
    /// Order `system` by descending confidence, breaking ties with this policy.
    ///
    /// `Top` and `Bottom` need the reference; without it they log an error and
    /// keep the alphabetical order.
    #[must_use]
    pub fn sort_alignment<'a>(
        &self,
        system: &'a Alignment,
        reference: Option<&Alignment>,
    ) -> Vec<&'a Correspondence> {
        let mut classes: BTreeMap<ConfidenceKey, Vec<&'a Correspondence>> = BTreeMap::new();
        for c in system {
            classes.entry(ConfidenceKey(c.confidence)).or_default().push(c);
        }

        let mut rng = match self {
            SameConfidenceRanking::Random => Some(StdRng::from_entropy()),
            SameConfidenceRanking::RandomWithSeed(seed) => Some(StdRng::seed_from_u64(*seed)),
            _ => None,
        };

        let mut sorted = Vec::with_capacity(system.len());
        for (_, mut ties) in classes.into_iter().rev() {
            ties.sort_by(|a, b| alphabetical(a, b));
            match self {
                SameConfidenceRanking::Alphabetically => {}
                SameConfidenceRanking::Random | SameConfidenceRanking::RandomWithSeed(_) => {
                    if let Some(rng) = rng.as_mut() {
                        ties.shuffle(rng);
                    }
                }
                SameConfidenceRanking::Top | SameConfidenceRanking::Bottom => match reference {
                    Some(reference) => {
                        let (hits, misses): (Vec<_>, Vec<_>) =
                            ties.into_iter().partition(|c| reference.contains(c));
                        ties = if *self == SameConfidenceRanking::Top {
                            hits.into_iter().chain(misses).collect()
                        } else {
                            misses.into_iter().chain(hits).collect()
                        };
                    }
                    None => {
                        log::error!(
                            "Chose {:?} as same-confidence ranking but no reference alignment was given; returning arbitrary order",
                            self
                        );
                    }
                },
            }
            sorted.extend(ties);
        }
        sorted
    }
}

impl std::fmt::Display for SameConfidenceRanking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SameConfidenceRanking::Alphabetically => write!(f, "alphabetically"),
            SameConfidenceRanking::Random => write!(f, "random"),
            SameConfidenceRanking::RandomWithSeed(seed) => write!(f, "random-with-seed({})", seed),
            SameConfidenceRanking::Top => write!(f, "top"),
            SameConfidenceRanking::Bottom => write!(f, "bottom"),
        }
    }
}

impl std::str::FromStr for SameConfidenceRanking {
    type Err = String;

    /// Accepts `alphabetically`, `random`, `random-with-seed`,
    /// `random-with-seed:<n>`, `top` and `bottom` (case-insensitive).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase().replace('_', "-");
        if let Some(seed) = lower.strip_prefix("random-with-seed:") {
            return seed
                .parse::<u64>()
                .map(SameConfidenceRanking::RandomWithSeed)
                .map_err(|e| format!("invalid seed '{}': {}", seed, e));
        }
        match lower.as_str() {
            "alphabetically" | "alphabetical" => Ok(SameConfidenceRanking::Alphabetically),
            "random" => Ok(SameConfidenceRanking::Random),
            "random-with-seed" => Ok(SameConfidenceRanking::RandomWithSeed(DEFAULT_SEED)),
            "top" => Ok(SameConfidenceRanking::Top),
            "bottom" => Ok(SameConfidenceRanking::Bottom),
            other => Err(format!(
                "unknown tie-break '{}' (alphabetically|random|random-with-seed[:n]|top|bottom)",
                other
            )),
        }
    }
}

/// Total order over confidences for grouping.
#[derive(Debug, Clone, Copy)]
struct ConfidenceKey(f64);

impl PartialEq for ConfidenceKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ConfidenceKey {}

impl PartialOrd for ConfidenceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ConfidenceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn alphabetical(a: &Correspondence, b: &Correspondence) -> Ordering {
    a.source
        .cmp(&b.source)
        .then_with(|| a.target.cmp(&b.target))
}

/// Scores of one ranking, or the mean of several after [`normalize`](Self::normalize).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RankingResult {
    /// Discounted cumulative gain.
    pub dcg: f64,
    /// DCG normalized by the ideal DCG.
    pub ndcg: f64,
    /// Mean of the precisions at each relevant rank.
    pub average_precision: f64,
    /// Inverse rank of the first relevant entry.
    pub reciprocal_rank: f64,
    /// Precision at rank `|reference|`.
    pub r_precision: f64,
    /// Relevant entries in the top K.
    pub hits_at_k: f64,
    /// HITS@K / K.
    pub precision_at_k: f64,
    /// HITS@K / |reference|.
    pub recall_at_k: f64,
    /// Harmonic mean of P@K and R@K.
    pub f1_at_k: f64,
    /// The K used.
    pub k_of_hits_at_k: usize,
}

impl RankingResult {
    /// All-zero result for the given K.
    #[must_use]
    pub fn zero(k: usize) -> Self {
        Self {
            k_of_hits_at_k: k,
            ..Self::default()
        }
    }

    /// Add every score of `other` to this result. K is kept.
    pub fn add_scores(&mut self, other: &RankingResult) {
        self.dcg += other.dcg;
        self.ndcg += other.ndcg;
        self.average_precision += other.average_precision;
        self.reciprocal_rank += other.reciprocal_rank;
        self.r_precision += other.r_precision;
        self.hits_at_k += other.hits_at_k;
        self.precision_at_k += other.precision_at_k;
        self.recall_at_k += other.recall_at_k;
        self.f1_at_k += other.f1_at_k;
    }

    /// Divide every score by `divisor`; a zero divisor leaves the result unchanged.
    pub fn normalize(&mut self, divisor: usize) {
        if divisor == 0 {
            return;
        }
        let d = divisor as f64;
        self.dcg /= d;
        self.ndcg /= d;
        self.average_precision /= d;
        self.reciprocal_rank /= d;
        self.r_precision /= d;
        self.hits_at_k /= d;
        self.precision_at_k /= d;
        self.recall_at_k /= d;
        self.f1_at_k /= d;
    }

    /// Weighted harmonic mean of P@K and R@K.
    #[must_use]
    pub fn f_beta_at_k(&self, beta: f64) -> f64 {
        f_beta(self.precision_at_k, self.recall_at_k, beta)
    }
}

impl std::fmt::Display for RankingResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "NDCG={:.4} MAP={:.4} MRR={:.4} R-Prec={:.4} HITS@{k}={:.2} P@{k}={:.4} R@{k}={:.4} F1@{k}={:.4}",
            self.ndcg,
            self.average_precision,
            self.reciprocal_rank,
            self.r_precision,
            self.hits_at_k,
            self.precision_at_k,
            self.recall_at_k,
            self.f1_at_k,
            k = self.k_of_hits_at_k
        )
    }
}

/// Computes [`RankingResult`]s.
///
/// ```rust
/// use concord::eval::{RankingMetric, SameConfidenceRanking};
/// use concord_core::{Alignment, Correspondence};
///
/// let reference: Alignment = vec![Correspondence::new("a", "x")].into();
/// let system: Alignment = vec![
///     Correspondence::new("a", "x").with_confidence(0.9),
///     Correspondence::new("a", "y").with_confidence(0.4),
/// ].into();
///
/// let result = RankingMetric::new(SameConfidenceRanking::Alphabetically)
///     .compute_alignments(&system, &reference);
/// assert!((result.reciprocal_rank - 1.0).abs() < 1e-9);
/// assert_eq!(result.k_of_hits_at_k, 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RankingMetric {
    tie_break: SameConfidenceRanking,
    k: Option<usize>,
    partial_reduction: bool,
}

impl RankingMetric {
    /// Metric with the given tie-break; K is inferred from the reference size.
    #[must_use]
    pub fn new(tie_break: SameConfidenceRanking) -> Self {
        Self {
            tie_break,
            k: None,
            partial_reduction: false,
        }
    }

    /// Fix K for HITS@K, P@K and R@K.
    #[must_use]
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = Some(k);
        self
    }

    /// Always reduce the system alignment to the reference entities, even for
    /// complete gold standards. Partial gold standards are always reduced.
    #[must_use]
    pub fn with_partial_reduction(mut self, enabled: bool) -> Self {
        self.partial_reduction = enabled;
        self
    }

    /// Tie-break policy in use.
    #[must_use]
    pub fn tie_break(&self) -> SameConfidenceRanking {
        self.tie_break
    }

    /// Ranking scores of one execution result.
    #[must_use]
    pub fn compute(&self, result: &ExecutionResult) -> RankingResult {
        let system = if self.partial_reduction || !result.completeness.is_complete() {
            reduce_to_reference_entities(&result.system, &result.reference)
        } else {
            result.system.clone()
        };
        self.compute_alignments(&system, &result.reference)
    }

    /// Ranking scores of `system` against `reference`, without reduction.
    #[must_use]
    pub fn compute_alignments(&self, system: &Alignment, reference: &Alignment) -> RankingResult {
        let k = self.resolve_k(reference);
        let ranking = self.tie_break.sort_alignment(system, Some(reference));
        if ranking.is_empty() {
            log::info!("System alignment is empty; ranking metrics are zero");
            return RankingResult::zero(k);
        }
        score_ranking(&ranking, reference, k)
    }

    fn resolve_k(&self, reference: &Alignment) -> usize {
        if let Some(k) = self.k {
            return k;
        }
        if reference.is_empty() {
            log::warn!(
                "Could not infer K for HITS@K from an empty reference alignment; using {}",
                DEFAULT_K
            );
            DEFAULT_K
        } else {
            log::info!("Inferring K for HITS@K as size of the reference alignment: {}", reference.len());
            reference.len()
        }
    }
}

impl Metric for RankingMetric {
    type Output = RankingResult;

    fn compute(&self, result: &ExecutionResult) -> RankingResult {
        RankingMetric::compute(self, result)
    }
}

/// Scores of an already ranked list.
#[must_use]
pub fn score_ranking(ranking: &[&Correspondence], reference: &Alignment, k: usize) -> RankingResult {
    let reference_size = reference.len();
    let mut true_positives = 0usize;
    let mut precisions: Vec<f64> = Vec::new();
    let mut dcg = 0.0;
    let mut hits = 0usize;
    let mut first_hit: Option<usize> = None;
    let mut r_precision_hits = 0usize;

    for (i, c) in ranking.iter().enumerate() {
        if !reference.contains(c) {
            continue;
        }
        true_positives += 1;
        if first_hit.is_none() {
            first_hit = Some(i + 1);
        }
        if i < reference_size {
            r_precision_hits += 1;
        }
        precisions.push(true_positives as f64 / (i + 1) as f64);
        dcg += discount(i);
        if i < k {
            hits += 1;
        }
    }

    let idcg = ideal_dcg(ranking.len());
    let ratio = |num: f64, den: f64| if den > 0.0 { num / den } else { 0.0 };

    let hits_at_k = hits as f64;
    let precision_at_k = ratio(hits_at_k, k as f64);
    let recall_at_k = ratio(hits_at_k, reference_size as f64);

    RankingResult {
        dcg,
        ndcg: ratio(dcg, idcg),
        average_precision: ratio(precisions.iter().sum(), precisions.len() as f64),
        reciprocal_rank: first_hit.map_or(0.0, |rank| 1.0 / rank as f64),
        r_precision: ratio(r_precision_hits as f64, reference_size as f64),
        hits_at_k,
        precision_at_k,
        recall_at_k,
        f1_at_k: f_beta(precision_at_k, recall_at_k, 1.0),
        k_of_hits_at_k: k,
    }
}

#[inline]
fn discount(position: usize) -> f64 {
    std::f64::consts::LN_2 / ((position + 2) as f64).ln()
}

/// DCG of a list of length `n` in which every entry is relevant.
#[must_use]
pub fn ideal_dcg(n: usize) -> f64 {
    (0..n).map(discount).sum()
}

/// Drop system correspondences whose source is not a reference source while
/// their target is a reference target.
#[must_use]
pub fn reduce_to_reference_entities(system: &Alignment, reference: &Alignment) -> Alignment {
    let sources: HashSet<&str> = reference.distinct_sources().into_iter().collect();
    let targets: HashSet<&str> = reference.distinct_targets().into_iter().collect();
    let mut reduced = system.clone();
    reduced.retain(|c| sources.contains(c.source.as_str()) || !targets.contains(c.target.as_str()));
    reduced
}
