use std::collections::HashMap;

use concord::cluster::{Agglomerative, Clustering, Kmeans, Kmedoids, Linkage, Spectral};
use concord::consensus::{reorder, ConsensusMatrix, DegreeFilter, LabelSet, NUM_ALGORITHMS};
use proptest::prelude::*;

fn label_sets() -> impl Strategy<Value = LabelSet> {
    (2usize..12).prop_flat_map(|n| {
        (
            prop::collection::vec(0usize..4, n),
            prop::collection::vec(0usize..4, n),
            prop::collection::vec(0usize..4, n),
            prop::collection::vec(0usize..4, n),
        )
            .prop_map(|(kmeans, hierarchical, kmedoids, spectral)| LabelSet {
                kmeans,
                hierarchical,
                kmedoids,
                spectral,
            })
    })
}

/// Unordered same-cluster pairs summed over all four algorithms.
fn expected_pair_total(labels: &LabelSet) -> usize {
    let mut total = 0;
    for algorithm in labels.algorithms() {
        let mut sizes: HashMap<usize, usize> = HashMap::new();
        for &label in algorithm {
            *sizes.entry(label).or_insert(0) += 1;
        }
        total += sizes.values().map(|&c| c * (c - 1) / 2).sum::<usize>();
    }
    total
}

proptest! {
    #[test]
    fn prop_consensus_is_symmetric_with_zero_diagonal(labels in label_sets()) {
        let m = ConsensusMatrix::from_labels(&labels, None).unwrap();
        for i in 0..m.len() {
            prop_assert_eq!(m.get(i, i), 0);
            for j in 0..m.len() {
                prop_assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
    }

    #[test]
    fn prop_consensus_entries_stay_in_range(labels in label_sets()) {
        let m = ConsensusMatrix::from_labels(&labels, None).unwrap();
        for &v in m.values() {
            prop_assert!(usize::from(v) <= NUM_ALGORITHMS);
        }
    }

    #[test]
    fn prop_consensus_conserves_pair_counts(labels in label_sets()) {
        // summing every ordered off-diagonal entry counts each unordered
        // same-cluster pair twice
        let m = ConsensusMatrix::from_labels(&labels, None).unwrap();
        let sum: usize = m.values().iter().map(|&v| usize::from(v)).sum();
        prop_assert_eq!(sum, 2 * expected_pair_total(&labels));
    }

    #[test]
    fn prop_all_filter_is_identity(labels in label_sets()) {
        let m = ConsensusMatrix::from_labels(&labels, None).unwrap();
        let filtered = DegreeFilter::All.apply(&m).unwrap();
        prop_assert_eq!(filtered, m);
    }

    #[test]
    fn prop_exact_filter_keeps_only_that_degree(
        labels in label_sets(),
        degree in 1u8..=4
    ) {
        let m = ConsensusMatrix::from_labels(&labels, None).unwrap();
        let filtered = DegreeFilter::Exactly(degree).apply(&m).unwrap();

        // values are the requested degree or zero, and stay symmetric
        for i in 0..filtered.len() {
            prop_assert_eq!(filtered.get(i, i), 0);
            for j in 0..filtered.len() {
                let v = filtered.get(i, j);
                prop_assert!(v == 0 || v == degree);
                prop_assert_eq!(v, filtered.get(j, i));
            }
        }

        // the kept observations are exactly those touching such a pair,
        // in their original order
        let expected: Vec<&String> = (0..m.len())
            .filter(|&i| (0..m.len()).any(|j| j != i && m.get(i, j) == degree))
            .map(|i| &m.ids()[i])
            .collect();
        let kept: Vec<&String> = filtered.ids().iter().collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn prop_reorder_preserves_values_and_symmetry(
        labels in label_sets(),
        k in 1usize..5,
        seed in 0u64..1000
    ) {
        let m = ConsensusMatrix::from_labels(&labels, None).unwrap();
        let (permuted, order) = reorder(&m, k, seed).unwrap();

        prop_assert_eq!(permuted.len(), m.len());
        prop_assert_eq!(order.len(), m.len());

        let mut before: Vec<u8> = m.values().to_vec();
        let mut after: Vec<u8> = permuted.values().to_vec();
        before.sort_unstable();
        after.sort_unstable();
        prop_assert_eq!(before, after);

        for i in 0..permuted.len() {
            prop_assert_eq!(permuted.get(i, i), 0);
            for j in 0..permuted.len() {
                prop_assert_eq!(permuted.get(i, j), permuted.get(j, i));
            }
        }

        // the permutation really maps old entries onto new positions
        for (new_i, &old_i) in order.iter().enumerate() {
            for (new_j, &old_j) in order.iter().enumerate() {
                prop_assert_eq!(permuted.get(new_i, new_j), m.get(old_i, old_j));
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_kmeans_labels_stay_in_range(
        data in prop::collection::vec(prop::collection::vec(-10.0f32..10.0, 2), 1..20),
        k in 1usize..5
    ) {
        // Skip if k > n
        if k <= data.len() {
            let labels = Kmeans::new(k).with_seed(42).fit_predict(&data).unwrap();
            prop_assert_eq!(labels.len(), data.len());
            for &l in &labels {
                prop_assert!(l < k);
            }
        }
    }

    #[test]
    fn prop_agglomerative_uses_exactly_k_clusters(
        data in prop::collection::vec(prop::collection::vec(-10.0f32..10.0, 2), 1..20),
        k in 1usize..5
    ) {
        if k <= data.len() {
            let labels = Agglomerative::new(k, Linkage::Average)
                .fit_predict(&data)
                .unwrap();
            prop_assert_eq!(labels.len(), data.len());
            let mut distinct = labels.clone();
            distinct.sort_unstable();
            distinct.dedup();
            // merging stops with k non-empty clusters
            prop_assert_eq!(distinct.len(), k);
            prop_assert!(labels.iter().all(|&l| l < k));
        }
    }

    #[test]
    fn prop_kmedoids_labels_stay_in_range(
        data in prop::collection::vec(prop::collection::vec(-10.0f32..10.0, 2), 1..20),
        k in 1usize..5
    ) {
        if k <= data.len() {
            let labels = Kmedoids::new(k).fit_predict(&data).unwrap();
            prop_assert_eq!(labels.len(), data.len());
            for &l in &labels {
                prop_assert!(l < k);
            }
        }
    }

    #[test]
    fn prop_spectral_labels_stay_in_range(
        data in prop::collection::vec(prop::collection::vec(-10.0f32..10.0, 2), 1..15),
        k in 1usize..4
    ) {
        if k <= data.len() {
            let labels = Spectral::new(k).with_seed(42).fit_predict(&data).unwrap();
            prop_assert_eq!(labels.len(), data.len());
            for &l in &labels {
                prop_assert!(l < k);
            }
        }
    }
}
