//! Property tests for the evaluation metrics and the closure refiner.
//!
//! Entities come from small alphabets so that system and reference overlap.

use concord::eval::{
    AggregationMode, ConfusionMatrixMetric, ExecutionResult, GoldStandardCompleteness, RankingMetric,
    RankingMetricGroup, SameConfidenceRanking,
};
use concord::refine::refine_alignment;
use concord::{Alignment, Correspondence, TripleOntology};
use proptest::prelude::*;

fn alignment_strategy() -> impl Strategy<Value = Alignment> {
    prop::collection::vec((0u8..5, 0u8..5, 0u8..4), 0..12).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(s, t, c)| {
                Correspondence::new(format!("s{}", s), format!("t{}", t)).with_confidence(f64::from(c) / 4.0)
            })
            .collect()
    })
}

fn completeness_strategy() -> impl Strategy<Value = GoldStandardCompleteness> {
    prop_oneof![
        Just(GoldStandardCompleteness::Complete),
        (any::<bool>(), any::<bool>()).prop_map(|(s, t)| GoldStandardCompleteness::partial(s, t)),
    ]
}

fn tie_break_strategy() -> impl Strategy<Value = SameConfidenceRanking> {
    prop_oneof![
        Just(SameConfidenceRanking::Alphabetically),
        Just(SameConfidenceRanking::Top),
        Just(SameConfidenceRanking::Bottom),
        any::<u64>().prop_map(SameConfidenceRanking::RandomWithSeed),
    ]
}

fn in_unit_interval(x: f64) -> bool {
    (0.0..=1.0 + 1e-12).contains(&x)
}

proptest! {
    #[test]
    fn confusion_scores_are_bounded(
        system in alignment_strategy(),
        reference in alignment_strategy(),
        completeness in completeness_strategy(),
    ) {
        let cm = ConfusionMatrixMetric::compute_alignments(&system, &reference, completeness);
        prop_assert!(in_unit_interval(cm.precision()));
        prop_assert!(in_unit_interval(cm.recall()));
        prop_assert!(in_unit_interval(cm.f1()));
        prop_assert!(cm.tp() <= system.len());
        prop_assert!(cm.tp() + cm.fn_count() <= reference.len());
    }

    #[test]
    fn complete_counts_partition_the_system(
        system in alignment_strategy(),
        reference in alignment_strategy(),
    ) {
        let cm = ConfusionMatrixMetric::compute_alignments(&system, &reference, GoldStandardCompleteness::Complete);
        prop_assert_eq!(cm.tp() + cm.fp(), system.len());
        prop_assert_eq!(cm.tp() + cm.fn_count(), reference.len());
    }

    #[test]
    fn f1_lies_between_min_and_max_of_precision_and_recall(
        system in alignment_strategy(),
        reference in alignment_strategy(),
    ) {
        let cm = ConfusionMatrixMetric::compute_alignments(&system, &reference, GoldStandardCompleteness::Complete);
        if cm.tp() > 0 {
            prop_assert!(cm.f1() <= cm.precision().max(cm.recall()) + 1e-12);
            prop_assert!(cm.f1() + 1e-12 >= cm.precision().min(cm.recall()));
        } else {
            prop_assert_eq!(cm.f1(), 0.0);
        }
    }

    #[test]
    fn single_matrix_aggregates_to_itself(
        system in alignment_strategy(),
        reference in alignment_strategy(),
    ) {
        let cm = ConfusionMatrixMetric::compute_alignments(&system, &reference, GoldStandardCompleteness::Complete);
        let matrices = vec![cm.clone()];
        for mode in [AggregationMode::Micro, AggregationMode::Macro] {
            let aggregated = ConfusionMatrixMetric::aggregate(mode, &matrices);
            prop_assert!((aggregated.precision() - cm.precision()).abs() < 1e-12);
            prop_assert!((aggregated.recall() - cm.recall()).abs() < 1e-12);
        }
    }

    #[test]
    fn ranking_scores_are_bounded(
        system in alignment_strategy(),
        reference in alignment_strategy(),
        tie_break in tie_break_strategy(),
    ) {
        let result = ExecutionResult::new(system, reference);
        for scores in [
            RankingMetric::new(tie_break).compute(&result),
            RankingMetricGroup::new(tie_break).compute(&result),
        ] {
            prop_assert!(in_unit_interval(scores.ndcg));
            prop_assert!(in_unit_interval(scores.average_precision));
            prop_assert!(in_unit_interval(scores.reciprocal_rank));
            prop_assert!(in_unit_interval(scores.r_precision));
            prop_assert!(in_unit_interval(scores.precision_at_k));
            prop_assert!(in_unit_interval(scores.recall_at_k));
        }
    }

    #[test]
    fn system_inside_reference_ranks_perfectly(
        reference in alignment_strategy(),
        tie_break in tie_break_strategy(),
    ) {
        prop_assume!(!reference.is_empty());
        let result = ExecutionResult::new(reference.clone(), reference);
        let scores = RankingMetric::new(tie_break).compute(&result);
        prop_assert!((scores.ndcg - 1.0).abs() < 1e-9);
        prop_assert!((scores.average_precision - 1.0).abs() < 1e-9);
        prop_assert!((scores.reciprocal_rank - 1.0).abs() < 1e-9);
    }

    #[test]
    fn deterministic_tie_breaks_repeat(
        system in alignment_strategy(),
        reference in alignment_strategy(),
        tie_break in tie_break_strategy(),
    ) {
        let order = |policy: SameConfidenceRanking| -> Vec<String> {
            policy
                .sort_alignment(&system, Some(&reference))
                .iter()
                .map(|c| format!("{} {}", c.source, c.target))
                .collect()
        };
        prop_assert_eq!(order(tie_break), order(tie_break));
    }

    #[test]
    fn top_never_scores_below_bottom(
        system in alignment_strategy(),
        reference in alignment_strategy(),
    ) {
        let result = ExecutionResult::new(system, reference);
        let top = RankingMetric::new(SameConfidenceRanking::Top).compute(&result);
        let bottom = RankingMetric::new(SameConfidenceRanking::Bottom).compute(&result);
        prop_assert!(top.ndcg + 1e-12 >= bottom.ndcg);
        prop_assert!(top.reciprocal_rank + 1e-12 >= bottom.reciprocal_rank);
    }

    #[test]
    fn closure_is_idempotent_and_keeps_inputs(
        alignment in alignment_strategy(),
        source_edges in prop::collection::vec((0u8..5, 0u8..5), 0..6),
        target_edges in prop::collection::vec((0u8..5, 0u8..5), 0..6),
    ) {
        let mut source = TripleOntology::new();
        for i in 0..5 {
            source.add_class(format!("s{}", i));
        }
        for (a, b) in source_edges {
            source.add_sub_class_of(format!("s{}", a), format!("s{}", b));
        }
        let mut target = TripleOntology::new();
        for i in 0..5 {
            target.add_class(format!("t{}", i));
        }
        for (a, b) in target_edges {
            target.add_sub_class_of(format!("t{}", a), format!("t{}", b));
        }

        let once = refine_alignment(&source, &target, &alignment);
        for c in &alignment {
            let kept = once.get_correspondence(&c.source, &c.target, c.relation);
            prop_assert!(kept.is_some());
            prop_assert_eq!(kept.map(|k| k.confidence), Some(c.confidence));
        }
        let twice = refine_alignment(&source, &target, &once);
        prop_assert_eq!(once.len(), twice.len());
    }
}
