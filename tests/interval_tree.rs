//! Randomized interval-tree verification: structural invariants after every
//! insert, and the pruned overlap query checked against the linear-scan
//! oracle across the whole spanned coordinate range.

use interval_trees::{IntervalTree, NodeId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

fn random_tree(rng: &mut StdRng) -> IntervalTree<i32> {
    let mut tree = IntervalTree::new();
    let count = rng.gen_range(300..=600);
    for _ in 0..count {
        let low = rng.gen_range(1..=200);
        let high = low + rng.gen_range(0..200);
        tree.insert((low, high)).expect("insert should work");
        tree.assert_invariants();
    }
    tree
}

#[test]
fn pruned_queries_agree_with_the_oracle_everywhere() {
    let mut rng = StdRng::seed_from_u64(1);
    let tree = random_tree(&mut rng);

    // The spanned range: lows start at 1, highs reach at most 200 + 199.
    for low in 1..=400 {
        for high in low..=400 {
            let pruned: HashSet<NodeId> =
                tree.find_all_overlapping((low, high)).into_iter().collect();
            let naive: HashSet<NodeId> = tree
                .find_all_overlapping_naive((low, high))
                .into_iter()
                .collect();
            assert_eq!(pruned, naive, "query [{}, {}]", low, high);

            // `search` reports some overlap exactly when one exists.
            match tree.search((low, high)) {
                Some(id) => assert!(naive.contains(&id)),
                None => assert!(naive.is_empty()),
            }
        }
    }
}

#[test]
fn invariants_hold_across_seeds() {
    for seed in 2..=5 {
        let mut rng = StdRng::seed_from_u64(seed);
        let tree = random_tree(&mut rng);

        // Spot-check a diagonal band of queries per seed.
        for low in (1..=400).step_by(7) {
            let high = low + 31;
            let pruned: HashSet<NodeId> =
                tree.find_all_overlapping((low, high)).into_iter().collect();
            let naive: HashSet<NodeId> = tree
                .find_all_overlapping_naive((low, high))
                .into_iter()
                .collect();
            assert_eq!(pruned, naive, "query [{}, {}] (seed {})", low, high, seed);
        }
    }
}
