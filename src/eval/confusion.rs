//! Confusion matrix of a system alignment against a reference alignment.
//!
//! # Complete gold standard
//!
//! Everything the system returns that is not in the reference is wrong:
//!
//! ```text
//! FP := system
//! for r in reference:
//!     r = UNKNOWN             -> drop (r.source, r.target, *) from FP   (never penalized)
//!     system has r exactly    -> move it from FP to TP
//!     otherwise               -> FN += r (confidence 0.0)
//! ```
//!
//! # Partial gold standard
//!
//! Only correspondences the reference says something about are judged:
//!
//! | Reference entry           | Effect                                                   |
//! |---------------------------|----------------------------------------------------------|
//! | `UNKNOWN`                 | ignored                                                  |
//! | `INCOMPAT (s, null)`      | every system `(s, *, =)` is a FP                         |
//! | `INCOMPAT (null, t)`      | every system `(*, t, =)` is a FP                         |
//! | `INCOMPAT (s, t)`         | system `(s, t, =)` is a FP                               |
//! | other `(s, t, rel)`       | TP if the system has it, else FN                         |
//! | ... and target complete   | other system `(*, t, rel)` are FPs                        |
//! | ... and source complete   | other system `(s, *, rel)` are FPs                        |
//!
//! True positives are finally removed from the false positives, which
//! matters when the reference maps one entity several times.
//!
//! # Aggregation
//!
//! - **Micro**: pool TP/FP/FN over all matrices, then divide.
//! - **Macro**: arithmetic mean of per-matrix precision, recall and F1.

use super::execution::{ExecutionResult, GoldStandardCompleteness};
use super::Metric;
use concord_core::{Alignment, CorrespondenceRelation};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// `numerator / (d1 + d2)`, or 0.0 when the denominator is not positive.
#[inline]
#[must_use]
pub fn divide_with_two_denominators(numerator: f64, d1: f64, d2: f64) -> f64 {
    if d1 + d2 > 0.0 {
        numerator / (d1 + d2)
    } else {
        0.0
    }
}

/// Weighted harmonic mean of precision and recall; 0.0 if both are 0.
#[inline]
#[must_use]
pub fn f_beta(precision: f64, recall: f64, beta: f64) -> f64 {
    let b2 = beta * beta;
    let denominator = b2 * precision + recall;
    if denominator > 0.0 {
        (1.0 + b2) * precision * recall / denominator
    } else {
        0.0
    }
}

/// TP/FP/FN partition with derived precision, recall and F1.
///
/// Serialize-only: the scores are derived from the sets (or averaged by
/// [`ConfusionMatrixMetric::macro_average`]) and are never read back.
///
/// ```compile_fail
/// let cm: concord::eval::ConfusionMatrix = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfusionMatrix {
    /// System correspondences confirmed by the reference.
    pub true_positives: Alignment,
    /// System correspondences judged wrong.
    pub false_positives: Alignment,
    /// Reference correspondences the system missed (confidence 0.0).
    pub false_negatives: Alignment,
    precision: f64,
    recall: f64,
    f1: f64,
    number_of_correspondences: usize,
}

impl ConfusionMatrix {
    /// Build from the three sets. `number_of_correspondences` is the size of
    /// the evaluated system alignment, which for partial gold standards can
    /// exceed `tp + fp`.
    #[must_use]
    pub fn new(
        true_positives: Alignment,
        false_positives: Alignment,
        false_negatives: Alignment,
        number_of_correspondences: usize,
    ) -> Self {
        let tp = true_positives.len() as f64;
        let fp = false_positives.len() as f64;
        let fn_ = false_negatives.len() as f64;
        let precision = divide_with_two_denominators(tp, tp, fp);
        let recall = divide_with_two_denominators(tp, tp, fn_);
        Self {
            true_positives,
            false_positives,
            false_negatives,
            precision,
            recall,
            f1: f_beta(precision, recall, 1.0),
            number_of_correspondences,
        }
    }

    /// Build with externally averaged scores (macro aggregation).
    fn averaged(
        true_positives: Alignment,
        false_positives: Alignment,
        false_negatives: Alignment,
        number_of_correspondences: usize,
        precision: f64,
        recall: f64,
        f1: f64,
    ) -> Self {
        Self {
            true_positives,
            false_positives,
            false_negatives,
            precision,
            recall,
            f1,
            number_of_correspondences,
        }
    }

    /// `tp / (tp + fp)`, 0.0 if there is nothing in the denominator.
    #[must_use]
    pub fn precision(&self) -> f64 {
        self.precision
    }

    /// `tp / (tp + fn)`, 0.0 if there is nothing in the denominator.
    #[must_use]
    pub fn recall(&self) -> f64 {
        self.recall
    }

    /// F1. For macro averages this is the mean of the individual F1 scores.
    #[must_use]
    pub fn f1(&self) -> f64 {
        self.f1
    }

    /// `(1 + β²)·P·R / (β²·P + R)`.
    #[must_use]
    pub fn f_beta(&self, beta: f64) -> f64 {
        f_beta(self.precision, self.recall, beta)
    }

    /// Size of the evaluated system alignment.
    #[must_use]
    pub fn number_of_correspondences(&self) -> usize {
        self.number_of_correspondences
    }

    /// Number of true positives.
    #[must_use]
    pub fn tp(&self) -> usize {
        self.true_positives.len()
    }

    /// Number of false positives.
    #[must_use]
    pub fn fp(&self) -> usize {
        self.false_positives.len()
    }

    /// Number of false negatives.
    #[must_use]
    pub fn fn_count(&self) -> usize {
        self.false_negatives.len()
    }

    /// Remove the TP/FP/FN of `other` from this matrix and recompute.
    #[must_use]
    pub fn subtract(&self, other: &ConfusionMatrix) -> ConfusionMatrix {
        let tp = self.true_positives.subtract(&other.true_positives);
        let fp = self.false_positives.subtract(&other.false_positives);
        let fn_ = self.false_negatives.subtract(&other.false_negatives);
        let n = tp.len() + fp.len();
        ConfusionMatrix::new(tp, fp, fn_, n)
    }

    /// One markdown table row: `| label | TP | FP | FN | P | R | F1 |`.
    #[must_use]
    pub fn to_markdown_row(&self, label: &str) -> String {
        format!(
            "| {} | {} | {} | {} | {:.4} | {:.4} | {:.4} |",
            label,
            self.tp(),
            self.fp(),
            self.fn_count(),
            self.precision,
            self.recall,
            self.f1
        )
    }

    /// Markdown table header matching [`to_markdown_row`](Self::to_markdown_row).
    #[must_use]
    pub fn markdown_header() -> &'static str {
        "| | TP | FP | FN | Precision | Recall | F1 |\n|---|---|---|---|---|---|---|"
    }
}

impl std::fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ConfusionMatrix: TP={}, FP={}, FN={}, P={:.4}, R={:.4}, F1={:.4}",
            self.tp(),
            self.fp(),
            self.fn_count(),
            self.precision,
            self.recall,
            self.f1
        )
    }
}

/// How several confusion matrices are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    /// Pool TP/FP/FN, then compute scores.
    #[default]
    Micro,
    /// Mean of per-matrix scores.
    Macro,
    /// Not an aggregation; treated as micro with a warning.
    None,
}

impl std::str::FromStr for AggregationMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "micro" => Ok(AggregationMode::Micro),
            "macro" => Ok(AggregationMode::Macro),
            "none" => Ok(AggregationMode::None),
            other => Err(format!("unknown aggregation mode '{}' (micro|macro)", other)),
        }
    }
}

/// Computes [`ConfusionMatrix`]es.
///
/// ```rust
/// use concord::eval::{ConfusionMatrixMetric, ExecutionResult};
/// use concord_core::{Alignment, Correspondence};
///
/// let reference: Alignment = vec![
///     Correspondence::new("a", "x"),
///     Correspondence::new("b", "y"),
/// ].into();
/// let system: Alignment = vec![
///     Correspondence::new("a", "x"),
///     Correspondence::new("b", "z"),
/// ].into();
///
/// let cm = ConfusionMatrixMetric::new().compute(&ExecutionResult::new(system, reference));
/// assert_eq!((cm.tp(), cm.fp(), cm.fn_count()), (1, 1, 1));
/// assert!((cm.precision() - 0.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfusionMatrixMetric;

impl ConfusionMatrixMetric {
    /// Create the metric.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Confusion matrix of one execution result, honoring its completeness
    /// and exclusion alignment.
    #[must_use]
    pub fn compute(&self, result: &ExecutionResult) -> ConfusionMatrix {
        let system = result.evaluated_system();
        Self::compute_alignments(&system, &result.reference, result.completeness)
    }

    /// Confusion matrix of `system` against `reference`.
    #[must_use]
    pub fn compute_alignments(
        system: &Alignment,
        reference: &Alignment,
        completeness: GoldStandardCompleteness,
    ) -> ConfusionMatrix {
        if completeness.is_complete() {
            compute_complete(system, reference)
        } else {
            compute_partial(system, reference, completeness)
        }
    }

    /// One confusion matrix per relation occurring in system or reference.
    #[must_use]
    pub fn compute_per_relation(
        &self,
        result: &ExecutionResult,
    ) -> BTreeMap<CorrespondenceRelation, ConfusionMatrix> {
        let system = result.evaluated_system();
        let mut relations = system.distinct_relations();
        relations.extend(result.reference.distinct_relations());
        relations
            .into_iter()
            .map(|relation| {
                let cm = Self::compute_alignments(
                    &system.with_relation_only(relation),
                    &result.reference.with_relation_only(relation),
                    result.completeness,
                );
                (relation, cm)
            })
            .collect()
    }

    /// Confusion matrices of many results; in parallel with `eval-parallel`.
    #[must_use]
    pub fn compute_all(&self, results: &[ExecutionResult]) -> Vec<ConfusionMatrix> {
        #[cfg(feature = "eval-parallel")]
        {
            use rayon::prelude::*;
            results.par_iter().map(|r| self.compute(r)).collect()
        }
        #[cfg(not(feature = "eval-parallel"))]
        {
            results.iter().map(|r| self.compute(r)).collect()
        }
    }

    /// Pool TP/FP/FN and recompute precision and recall.
    #[must_use]
    pub fn micro_average(matrices: &[ConfusionMatrix]) -> ConfusionMatrix {
        let (tp, fp, fn_, n) = pool(matrices);
        ConfusionMatrix::new(tp, fp, fn_, n)
    }

    /// Mean of precision, recall and F1 over the matrices.
    #[must_use]
    pub fn macro_average(matrices: &[ConfusionMatrix]) -> ConfusionMatrix {
        Self::macro_average_with_count(matrices, matrices.len())
    }

    /// Like [`macro_average`](Self::macro_average), dividing the sums by an
    /// explicit number of test cases.
    #[must_use]
    pub fn macro_average_with_count(matrices: &[ConfusionMatrix], test_cases: usize) -> ConfusionMatrix {
        let (tp, fp, fn_, n) = pool(matrices);
        if test_cases == 0 {
            return ConfusionMatrix::averaged(tp, fp, fn_, n, 0.0, 0.0, 0.0);
        }
        let count = test_cases as f64;
        let precision = matrices.iter().map(ConfusionMatrix::precision).sum::<f64>() / count;
        let recall = matrices.iter().map(ConfusionMatrix::recall).sum::<f64>() / count;
        let f1 = matrices.iter().map(ConfusionMatrix::f1).sum::<f64>() / count;
        ConfusionMatrix::averaged(tp, fp, fn_, n, precision, recall, f1)
    }

    /// Aggregate with the given mode. `None` falls back to micro.
    #[must_use]
    pub fn aggregate(mode: AggregationMode, matrices: &[ConfusionMatrix]) -> ConfusionMatrix {
        match mode {
            AggregationMode::Micro => Self::micro_average(matrices),
            AggregationMode::Macro => Self::macro_average(matrices),
            AggregationMode::None => {
                log::warn!("Invalid aggregation mode NONE; falling back to micro average");
                Self::micro_average(matrices)
            }
        }
    }

    /// Micro average over execution results.
    #[must_use]
    pub fn micro_average_results(&self, results: &[ExecutionResult]) -> ConfusionMatrix {
        Self::micro_average(&self.compute_all(results))
    }

    /// Macro average over execution results.
    #[must_use]
    pub fn macro_average_results(&self, results: &[ExecutionResult]) -> ConfusionMatrix {
        Self::macro_average(&self.compute_all(results))
    }
}

impl Metric for ConfusionMatrixMetric {
    type Output = ConfusionMatrix;

    fn compute(&self, result: &ExecutionResult) -> ConfusionMatrix {
        ConfusionMatrixMetric::compute(self, result)
    }
}

fn pool(matrices: &[ConfusionMatrix]) -> (Alignment, Alignment, Alignment, usize) {
    let mut tp = Alignment::new();
    let mut fp = Alignment::new();
    let mut fn_ = Alignment::new();
    let mut n = 0;
    for m in matrices {
        tp.add_all(&m.true_positives);
        fp.add_all(&m.false_positives);
        fn_.add_all(&m.false_negatives);
        n += m.number_of_correspondences;
    }
    (tp, fp, fn_, n)
}

fn compute_complete(system: &Alignment, reference: &Alignment) -> ConfusionMatrix {
    let mut tp = Alignment::new();
    let mut fn_ = Alignment::new();
    let mut ignored: HashSet<(&str, &str)> = HashSet::new();

    for r in reference {
        if r.relation == CorrespondenceRelation::Unknown {
            ignored.insert((r.source.as_str(), r.target.as_str()));
            continue;
        }
        match system.get_correspondence(&r.source, &r.target, r.relation) {
            Some(found) => {
                tp.add(found.clone());
            }
            None => {
                fn_.add(r.clone().with_confidence(0.0));
            }
        }
    }

    let fp: Alignment = system
        .iter()
        .filter(|c| !tp.contains(c) && !ignored.contains(&(c.source.as_str(), c.target.as_str())))
        .cloned()
        .collect();
    ConfusionMatrix::new(tp, fp, fn_, system.len())
}

fn is_null_entity(uri: &str) -> bool {
    uri == "null" || uri.trim().is_empty()
}

fn compute_partial(
    system: &Alignment,
    reference: &Alignment,
    completeness: GoldStandardCompleteness,
) -> ConfusionMatrix {
    let mut tp = Alignment::new();
    let mut fp = Alignment::new();
    let mut fn_ = Alignment::new();

    for r in reference {
        match r.relation {
            CorrespondenceRelation::Unknown => {}
            CorrespondenceRelation::Incompat => {
                let equivalence = CorrespondenceRelation::Equivalence;
                if is_null_entity(&r.target) {
                    fp.add_all(system.by_source_relation(&r.source, equivalence));
                } else if is_null_entity(&r.source) {
                    fp.add_all(system.by_target_relation(&r.target, equivalence));
                } else if let Some(found) = system.get_correspondence(&r.source, &r.target, equivalence) {
                    fp.add(found.clone());
                }
            }
            relation => {
                match system.get_correspondence(&r.source, &r.target, relation) {
                    Some(found) => {
                        tp.add(found.clone());
                    }
                    None => {
                        fn_.add(r.clone().with_confidence(0.0));
                    }
                }
                if completeness.is_target_complete() {
                    fp.add_all(system.by_target_relation(&r.target, relation).filter(|c| *c != r));
                }
                if completeness.is_source_complete() {
                    fp.add_all(system.by_source_relation(&r.source, relation).filter(|c| *c != r));
                }
            }
        }
    }

    fp.remove_all(&tp);
    ConfusionMatrix::new(tp, fp, fn_, system.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_core::Correspondence;
    use CorrespondenceRelation::*;

    fn alignment(pairs: &[(&str, &str)]) -> Alignment {
        pairs.iter().map(|(s, t)| Correspondence::new(*s, *t)).collect()
    }

    #[test]
    fn test_complete_basic() {
        let reference = alignment(&[("a", "x"), ("b", "y"), ("c", "z"), ("d", "w")]);
        let system = alignment(&[("a", "x"), ("b", "y"), ("d", "c")]);
        let cm = ConfusionMatrixMetric::compute_alignments(&system, &reference, GoldStandardCompleteness::Complete);

        assert_eq!(cm.tp(), 2);
        assert_eq!(cm.fp(), 1);
        assert_eq!(cm.fn_count(), 2);
        assert!((cm.precision() - 2.0 / 3.0).abs() < 1e-9);
        assert!((cm.recall() - 0.5).abs() < 1e-9);
        let expected_f1 = 2.0 * (2.0 / 3.0) * 0.5 / (2.0 / 3.0 + 0.5);
        assert!((cm.f1() - expected_f1).abs() < 1e-9);
        assert_eq!(cm.number_of_correspondences(), 3);
    }

    #[test]
    fn test_false_negatives_get_zero_confidence() {
        let reference = alignment(&[("a", "x")]);
        let cm = ConfusionMatrixMetric::compute_alignments(
            &Alignment::new(),
            &reference,
            GoldStandardCompleteness::Complete,
        );
        let missed = cm.false_negatives.iter().next().unwrap();
        assert_eq!(missed.confidence, 0.0);
        assert_eq!(reference.iter().next().unwrap().confidence, 1.0);
    }

    #[test]
    fn test_complete_unknown_is_silently_ignored() {
        let mut reference = Alignment::new();
        reference.add_triple("a", "x", Unknown);
        let mut system = Alignment::new();
        system.add_triple("a", "x", Equivalence);
        system.add_triple("a", "x", Subsume);
        let cm = ConfusionMatrixMetric::compute_alignments(&system, &reference, GoldStandardCompleteness::Complete);
        assert_eq!((cm.tp(), cm.fp(), cm.fn_count()), (0, 0, 0));
        assert_eq!(cm.precision(), 0.0);
        assert_eq!(cm.recall(), 0.0);
    }

    #[test]
    fn test_zero_denominators() {
        let cm = ConfusionMatrix::default();
        assert_eq!(cm.precision(), 0.0);
        assert_eq!(cm.recall(), 0.0);
        assert_eq!(cm.f1(), 0.0);
        assert!(!cm.f_beta(2.0).is_nan());

        let empty = ConfusionMatrixMetric::compute_alignments(
            &Alignment::new(),
            &Alignment::new(),
            GoldStandardCompleteness::Complete,
        );
        assert_eq!(empty.precision(), 0.0);
        assert_eq!(empty.recall(), 0.0);
    }

    #[test]
    fn test_partial_ignores_unjudged_correspondences() {
        let reference = alignment(&[("a", "x")]);
        let system = alignment(&[("a", "x"), ("q", "r")]);
        let cm = ConfusionMatrixMetric::compute_alignments(
            &system,
            &reference,
            GoldStandardCompleteness::partial(false, false),
        );
        assert_eq!((cm.tp(), cm.fp(), cm.fn_count()), (1, 0, 0));
        assert_eq!(cm.number_of_correspondences(), 2);
    }

    #[test]
    fn test_partial_target_complete_penalizes_shared_target() {
        let reference = alignment(&[("a", "x")]);
        let system = alignment(&[("a", "x"), ("b", "x"), ("a", "y")]);
        let cm = ConfusionMatrixMetric::compute_alignments(
            &system,
            &reference,
            GoldStandardCompleteness::partial(false, true),
        );
        assert_eq!(cm.tp(), 1);
        assert_eq!(cm.fp(), 1);
        assert!(cm.false_positives.contains(&Correspondence::new("b", "x")));
    }

    #[test]
    fn test_partial_source_complete_penalizes_shared_source() {
        let reference = alignment(&[("a", "x")]);
        let system = alignment(&[("a", "x"), ("b", "x"), ("a", "y")]);
        let cm = ConfusionMatrixMetric::compute_alignments(
            &system,
            &reference,
            GoldStandardCompleteness::partial(true, false),
        );
        assert_eq!(cm.fp(), 1);
        assert!(cm.false_positives.contains(&Correspondence::new("a", "y")));
    }

    #[test]
    fn test_partial_incompat() {
        let mut reference = Alignment::new();
        reference.add_triple("a", "null", Incompat);
        reference.add_triple("", "y", Incompat);
        reference.add_triple("c", "z", Incompat);
        let system = alignment(&[("a", "x1"), ("a", "x2"), ("b", "y"), ("c", "z"), ("d", "w")]);
        let cm = ConfusionMatrixMetric::compute_alignments(
            &system,
            &reference,
            GoldStandardCompleteness::partial(false, false),
        );
        assert_eq!(cm.tp(), 0);
        assert_eq!(cm.fp(), 4);
        assert!(!cm.false_positives.contains(&Correspondence::new("d", "w")));
    }

    #[test]
    fn test_partial_tp_never_counted_as_fp() {
        // Reference maps `a` twice; with source completeness (a, x) would be
        // flagged through (a, y) unless TPs are removed from FPs.
        let reference = alignment(&[("a", "x"), ("a", "y")]);
        let system = alignment(&[("a", "x")]);
        let cm = ConfusionMatrixMetric::compute_alignments(
            &system,
            &reference,
            GoldStandardCompleteness::partial(true, true),
        );
        assert_eq!((cm.tp(), cm.fp(), cm.fn_count()), (1, 0, 1));
    }

    #[test]
    fn test_exclusion_alignment() {
        let reference = alignment(&[("a", "x")]);
        let system = alignment(&[("a", "x"), ("b", "y")]);
        let result = ExecutionResult::new(system, reference).with_exclusion(alignment(&[("b", "y")]));
        let cm = ConfusionMatrixMetric::new().compute(&result);
        assert_eq!((cm.tp(), cm.fp()), (1, 0));
        assert_eq!(cm.number_of_correspondences(), 1);
    }

    fn matrix(prefix: &str, tp: usize, fp: usize, fn_: usize) -> ConfusionMatrix {
        let mk = |kind: &str, n: usize| -> Alignment {
            (0..n)
                .map(|i| Correspondence::new(format!("{}-{}-s{}", prefix, kind, i), format!("{}-t{}", prefix, i)))
                .collect()
        };
        ConfusionMatrix::new(mk("tp", tp), mk("fp", fp), mk("fn", fn_), tp + fp)
    }

    #[test]
    fn test_micro_and_macro() {
        let matrices = vec![matrix("m1", 2, 1, 1), matrix("m2", 1, 3, 0), matrix("m3", 3, 0, 3)];

        let micro = ConfusionMatrixMetric::micro_average(&matrices);
        assert!((micro.precision() - 0.6).abs() < 1e-9);
        assert!((micro.recall() - 0.6).abs() < 1e-9);
        assert!((micro.f1() - 0.6).abs() < 1e-9);
        assert_eq!(micro.number_of_correspondences(), 10);

        let macro_ = ConfusionMatrixMetric::macro_average(&matrices);
        let p = (2.0 / 3.0 + 0.25 + 1.0) / 3.0;
        let r = (2.0 / 3.0 + 1.0 + 0.5) / 3.0;
        assert!((macro_.precision() - p).abs() < 1e-9);
        assert!((macro_.recall() - r).abs() < 1e-9);
        let f1s = matrices.iter().map(|m| m.f1()).sum::<f64>() / 3.0;
        assert!((macro_.f1() - f1s).abs() < 1e-9);
        assert!((macro_.f1() - 0.5778).abs() < 1e-3);
    }

    #[test]
    fn test_macro_with_count_equals_mean() {
        let matrices = vec![matrix("a", 2, 2, 0), matrix("b", 2, 1, 0)];
        let by_len = ConfusionMatrixMetric::macro_average(&matrices);
        let by_count = ConfusionMatrixMetric::macro_average_with_count(&matrices, 2);
        assert!((by_len.precision() - by_count.precision()).abs() < 1e-12);
        assert!((by_len.precision() - (0.5 + 2.0 / 3.0) / 2.0).abs() < 1e-9);

        let micro = ConfusionMatrixMetric::micro_average(&matrices);
        assert!((micro.precision() - 4.0 / 7.0).abs() < 1e-9);
        assert!((micro.precision() - by_len.precision()).abs() > 1e-6);
    }

    #[test]
    fn test_none_mode_falls_back_to_micro() {
        let matrices = vec![matrix("a", 1, 1, 0), matrix("b", 1, 0, 0)];
        let none = ConfusionMatrixMetric::aggregate(AggregationMode::None, &matrices);
        let micro = ConfusionMatrixMetric::micro_average(&matrices);
        assert_eq!(none.precision(), micro.precision());
    }

    #[test]
    fn test_empty_aggregation() {
        let macro_ = ConfusionMatrixMetric::macro_average(&[]);
        assert_eq!(macro_.precision(), 0.0);
        let micro = ConfusionMatrixMetric::micro_average(&[]);
        assert_eq!(micro.recall(), 0.0);
    }

    #[test]
    fn test_subtract() {
        let full = matrix("m", 2, 2, 2);
        let part = ConfusionMatrix::new(
            full.true_positives.iter().take(1).cloned().collect(),
            Alignment::new(),
            Alignment::new(),
            1,
        );
        let rest = full.subtract(&part);
        assert_eq!((rest.tp(), rest.fp(), rest.fn_count()), (1, 2, 2));
        assert!((rest.precision() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_per_relation() {
        let mut reference = Alignment::new();
        reference.add_triple("a", "x", Equivalence);
        reference.add_triple("b", "y", Subsume);
        let mut system = Alignment::new();
        system.add_triple("a", "x", Equivalence);
        system.add_triple("b", "y", Subsumed);
        let per = ConfusionMatrixMetric::new().compute_per_relation(&ExecutionResult::new(system, reference));
        assert_eq!(per.len(), 3);
        assert!((per[&Equivalence].precision() - 1.0).abs() < 1e-9);
        assert_eq!(per[&Subsume].fn_count(), 1);
        assert_eq!(per[&Subsumed].fp(), 1);
    }

    #[test]
    fn test_f_beta() {
        assert!((f_beta(0.5, 0.5, 1.0) - 0.5).abs() < 1e-12);
        let f2 = f_beta(1.0, 0.5, 2.0);
        assert!((f2 - 5.0 * 0.5 / (4.0 + 0.5)).abs() < 1e-12);
        assert_eq!(f_beta(0.0, 0.0, 0.5), 0.0);
    }

    #[test]
    fn test_markdown_row_matches_header() {
        let cm = matrix("m", 2, 1, 1);
        let row = cm.to_markdown_row("run");
        assert_eq!(row, "| run | 2 | 1 | 1 | 0.6667 | 0.6667 | 0.6667 |");
        let header_cells = ConfusionMatrix::markdown_header().lines().next().unwrap().matches('|').count();
        assert_eq!(row.matches('|').count(), header_cells);
    }

    #[test]
    fn test_complete_scales_linearly() {
        let n = 20_000;
        let reference: Alignment = (0..n)
            .map(|i| Correspondence::new(format!("s{}", i), format!("t{}", i)))
            .collect();
        let mut system = reference.clone();
        for i in 0..n {
            system.add(Correspondence::new(format!("s{}", i), format!("u{}", i)));
        }
        let mut with_unknown = reference.clone();
        for i in 0..n {
            with_unknown.add_triple(format!("s{}", i), format!("u{}", i), Unknown);
        }

        let start = std::time::Instant::now();
        let cm = ConfusionMatrixMetric::compute_alignments(&system, &reference, GoldStandardCompleteness::Complete);
        let ignored =
            ConfusionMatrixMetric::compute_alignments(&system, &with_unknown, GoldStandardCompleteness::Complete);
        let elapsed = start.elapsed();

        assert_eq!((cm.tp(), cm.fp(), cm.fn_count()), (n, n, 0));
        assert_eq!((ignored.tp(), ignored.fp(), ignored.fn_count()), (n, 0, 0));
        assert!(elapsed.as_secs() < 10, "complete evaluation of {} took {:?}", n, elapsed);
    }

    #[test]
    fn test_complete_keeps_system_order_in_false_positives() {
        let reference = alignment(&[("b", "y")]);
        let system = alignment(&[("c", "z"), ("b", "y"), ("a", "x")]);
        let cm = ConfusionMatrixMetric::compute_alignments(&system, &reference, GoldStandardCompleteness::Complete);
        let fp: Vec<&str> = cm.false_positives.iter().map(|c| c.source.as_str()).collect();
        assert_eq!(fp, vec!["c", "a"]);
    }
}
