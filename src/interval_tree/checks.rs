//! Structural verifiers and the linear-scan oracle.
//!
//! A failing check indicates a bug in the tree code itself, never a user
//! error, which is why these panic instead of returning errors.

use super::IntervalTree;
use crate::arena::{NodeId, SENTINEL};
use crate::coordinate::Coordinate;
use crate::interval::Interval;
use smallvec::SmallVec;

impl<T> IntervalTree<T>
where
    T: Coordinate,
{
    /// Asserts every structural invariant of the tree: BST order on the low
    /// endpoints, recorded subtree heights, AVL balance factors, augmented
    /// max fields, and parent/child link consistency.
    pub fn assert_invariants(&self) {
        self.assert_order();
        if self.root != SENTINEL {
            assert_eq!(
                self.arena[self.root].parent,
                SENTINEL,
                "root must not have a parent"
            );
            self.verify_heights(self.root);
            self.verify_max(self.root);
        }
        self.verify_links();
    }

    fn assert_order(&self) {
        let mut previous: Option<T> = None;
        for id in self.iter_inorder() {
            let low = self.arena[id].interval.low;
            if let Some(previous) = previous {
                assert!(
                    previous <= low,
                    "inorder low endpoints must be non-decreasing: {:?} before {:?}",
                    previous,
                    low
                );
            }
            previous = Some(low);
        }
    }

    fn verify_heights(&self, x: NodeId) -> u16 {
        if x == SENTINEL {
            return 0;
        }

        let lh = self.verify_heights(self.arena[x].left);
        let rh = self.verify_heights(self.arena[x].right);

        let height = 1 + lh.max(rh);
        assert_eq!(
            self.arena[x].height, height,
            "recorded height is stale at {:?}",
            self.arena[x]
        );

        let diff = i32::from(rh) - i32::from(lh);
        assert!(
            diff.abs() <= 1,
            "balance factor {} out of range at {:?}",
            diff,
            self.arena[x]
        );

        height
    }

    fn verify_max(&self, x: NodeId) -> T {
        if x == SENTINEL {
            return T::MIN_COORD;
        }

        let lm = self.verify_max(self.arena[x].left);
        let rm = self.verify_max(self.arena[x].right);

        let max = self.arena[x].interval.high.max(lm).max(rm);
        assert_eq!(
            self.arena[x].max, max,
            "augmented max is stale at {:?}",
            self.arena[x]
        );

        max
    }

    fn verify_links(&self) {
        for id in self.arena.ids() {
            let left = self.arena[id].left;
            let right = self.arena[id].right;

            if left != SENTINEL {
                assert_eq!(self.arena[left].parent, id, "left child disowns its parent");
            }
            if right != SENTINEL {
                assert_eq!(self.arena[right].parent, id, "right child disowns its parent");
            }
        }
    }

    /// Collects every overlapping interval by scanning the whole arena.
    ///
    /// The oracle counterpart of [`IntervalTree::find_all_overlapping`];
    /// tests compare the two as sets.
    pub fn find_all_overlapping_naive<I>(&self, interval: I) -> SmallVec<[NodeId; 16]>
    where
        I: Into<Interval<T>>,
    {
        let query = interval.into();
        self.arena
            .ids()
            .filter(|&id| self.arena[id].interval.overlaps_with(&query))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::super::test::construct_test_tree;
    use crate::types::HashSet;

    #[test]
    fn invariants_hold_for_the_test_tree() {
        construct_test_tree().assert_invariants();
    }

    #[test]
    fn pruned_query_agrees_with_the_oracle() {
        let tree = construct_test_tree();
        for low in 0..=45 {
            for high in low..=45 {
                let pruned: HashSet<_> = tree.find_all_overlapping((low, high)).into_iter().collect();
                let naive: HashSet<_> = tree
                    .find_all_overlapping_naive((low, high))
                    .into_iter()
                    .collect();
                assert_eq!(pruned, naive, "query [{}, {}]", low, high);
            }
        }
    }
}
