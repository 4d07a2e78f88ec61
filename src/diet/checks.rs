//! Structural verifiers for both DIET flavors.
//!
//! A failing check indicates a bug in the tree code itself, never a user
//! error, which is why these panic instead of returning errors.

use super::node::IntervalNode;
use super::{AvlDiet, Diet};
use crate::arena::{Arena, NodeId, SENTINEL};
use crate::coordinate::Coordinate;
use crate::interval::Interval;
use crate::traversal::InorderIter;

/// Asserts BST order: the inorder walk yields non-decreasing low endpoints.
fn assert_order<T, N>(arena: &Arena<N>, root: NodeId)
where
    T: Coordinate,
    N: IntervalNode<T>,
{
    let mut previous: Option<T> = None;
    for id in InorderIter::new(arena, root) {
        let low = arena[id].interval().low;
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

/// Asserts isolation: no two stored intervals overlap or touch, i.e. every
/// pair is separated by a gap of at least one integer.
fn assert_isolation<T, N>(arena: &Arena<N>, root: NodeId)
where
    T: Coordinate,
    N: IntervalNode<T>,
{
    let intervals: Vec<Interval<T>> = InorderIter::new(arena, root)
        .map(|id| arena[id].interval())
        .collect();

    for (i, x) in intervals.iter().enumerate() {
        for y in intervals.iter().skip(i + 1) {
            assert!(
                !x.overlaps_or_touches(y),
                "stored intervals must be isolated: {:?} and {:?}",
                x,
                y
            );
        }
    }
}

impl<T> Diet<T>
where
    T: Coordinate,
{
    /// Asserts every structural invariant of the stored set: BST order on
    /// the low endpoints and pairwise isolation.
    pub fn assert_invariants(&self) {
        assert_order(&self.arena, self.root);
        assert_isolation(&self.arena, self.root);
    }
}

impl<T> AvlDiet<T>
where
    T: Coordinate,
{
    /// Asserts every structural invariant of the stored set: BST order,
    /// pairwise isolation, recorded subtree heights, and AVL balance.
    pub fn assert_invariants(&self) {
        assert_order(self.arena(), self.root());
        assert_isolation(self.arena(), self.root());
        self.verify_heights(self.root());
    }

    fn verify_heights(&self, t: NodeId) -> u16 {
        if t == SENTINEL {
            return 0;
        }

        let node = &self.arena()[t];
        let lh = self.verify_heights(node.left);
        let rh = self.verify_heights(node.right);

        let height = 1 + lh.max(rh);
        assert_eq!(
            node.height, height,
            "recorded height is stale at {:?}",
            node
        );

        let diff = i32::from(rh) - i32::from(lh);
        assert!(
            diff.abs() <= 1,
            "balance factor {} out of range at {:?}",
            diff,
            node
        );

        height
    }
}
