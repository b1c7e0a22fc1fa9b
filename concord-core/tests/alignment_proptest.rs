//! Property tests for alignment set operations.

use concord_core::{Alignment, Correspondence, CorrespondenceRelation};
use proptest::prelude::*;

/// Every relation with an exact inverse.
fn relation_strategy() -> impl Strategy<Value = CorrespondenceRelation> {
    let relations: Vec<CorrespondenceRelation> = CorrespondenceRelation::ALL
        .into_iter()
        .filter(|r| *r != CorrespondenceRelation::NonTransitiveImplication)
        .collect();
    prop::sample::select(relations)
}

fn alignment_strategy() -> impl Strategy<Value = Alignment> {
    prop::collection::vec((0u8..4, 0u8..4, relation_strategy(), 0u8..=10), 0..16).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(s, t, r, c)| {
                Correspondence::new(format!("http://a#E{}", s), format!("http://b#E{}", t))
                    .with_relation(r)
                    .with_confidence(f64::from(c) / 10.0)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn union_intersection_subtract_are_consistent(a in alignment_strategy(), b in alignment_strategy()) {
        let union = a.union(&b);
        let intersection = a.intersection(&b);
        let only_a = a.subtract(&b);
        prop_assert_eq!(only_a.len() + intersection.len(), a.len());
        prop_assert_eq!(union.len(), a.len() + b.len() - intersection.len());
        for c in &only_a {
            prop_assert!(!b.contains(c));
        }
    }

    #[test]
    fn remove_all_matches_subtract(a in alignment_strategy(), b in alignment_strategy()) {
        let mut in_place = a.clone();
        in_place.remove_all(&b);
        prop_assert_eq!(in_place, a.subtract(&b));
    }

    #[test]
    fn reverse_twice_is_identity(a in alignment_strategy()) {
        prop_assert_eq!(a.reverse().reverse(), a);
    }

    #[test]
    fn cut_keeps_only_confident(a in alignment_strategy(), threshold in 0.0f64..=1.0) {
        let cut = a.cut(threshold);
        prop_assert!(cut.iter().all(|c| c.confidence >= threshold));
        prop_assert_eq!(cut.len(), a.iter().filter(|c| c.confidence >= threshold).count());
    }
}
