//! Property-based tests for ranking and reconciliation using proptest.

use proptest::prelude::*;
use serde_json::json;
use shapformel_core::attribution::rank_features;
use shapformel_core::interpret::category_share;
use shapformel_core::{Frame, TOP_K, reconcile};
use std::collections::HashMap;

fn feature_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("f{i}")).collect()
}

// --- Top-K ranking properties ---

proptest! {
    #[test]
    fn ranking_length_is_min_k_n(scores in prop::collection::vec(-100.0f64..100.0, 0..40)) {
        let ranked = rank_features(&scores, TOP_K);
        prop_assert_eq!(ranked.len(), scores.len().min(TOP_K));
    }

    #[test]
    fn ranking_is_non_increasing_in_magnitude(scores in prop::collection::vec(-100.0f64..100.0, 1..40)) {
        let ranked = rank_features(&scores, TOP_K);
        for pair in ranked.windows(2) {
            prop_assert!(scores[pair[0]].abs() >= scores[pair[1]].abs());
        }
    }

    #[test]
    fn ranking_head_is_the_largest(scores in prop::collection::vec(-100.0f64..100.0, 1..40)) {
        let ranked = rank_features(&scores, TOP_K);
        let max = scores.iter().map(|s| s.abs()).fold(0.0f64, f64::max);
        prop_assert_eq!(scores[ranked[0]].abs(), max);
    }
}

// --- Reconciliation properties ---

fn arb_case() -> impl Strategy<Value = (Vec<String>, HashMap<String, String>)> {
    (1usize..25).prop_flat_map(|n| {
        let names = feature_names(n);
        let top = Just(names.clone()).prop_shuffle().prop_map(|mut v| {
            v.truncate(TOP_K);
            v
        });
        let sufficient = prop::sample::subsequence(names, 0..=n).prop_map(|picked| {
            picked
                .into_iter()
                .map(|name| {
                    let literal = format!("{name} <= 0.5");
                    (name, literal)
                })
                .collect::<HashMap<_, _>>()
        });
        (top, sufficient)
    })
}

proptest! {
    #[test]
    fn reconciled_is_ordered_subset_of_top((top, sufficient) in arb_case()) {
        let result = reconcile(&sufficient, &top);
        let expected: Vec<String> = top
            .iter()
            .filter(|name| sufficient.contains_key(*name))
            .cloned()
            .collect();
        prop_assert_eq!(result.names(), expected);
        for feature in &result {
            prop_assert_eq!(Some(&feature.literal), sufficient.get(&feature.name));
        }
    }

    #[test]
    fn reconcile_is_idempotent((top, sufficient) in arb_case()) {
        let once = reconcile(&sufficient, &top);
        let twice = reconcile(&once.to_map(), &once.names());
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn reconcile_with_empty_sufficient_is_empty((top, _sufficient) in arb_case()) {
        prop_assert!(reconcile(&HashMap::new(), &top).is_empty());
    }
}

// --- Categorical share ---

proptest! {
    #[test]
    fn category_share_is_a_percentage(
        column in prop::collection::vec(0i64..4, 1..50),
        value in 0i64..6,
    ) {
        let data = Frame::from_columns(&["c"], column.iter().map(|v| vec![json!(v)]).collect());
        let share = category_share(&data, "c", &json!(value));
        prop_assert!((0.0..=100.0).contains(&share));
        let expected = column.iter().filter(|v| **v == value).count() as f64 / column.len() as f64 * 100.0;
        prop_assert!((share - expected).abs() < 1e-9);
    }
}
