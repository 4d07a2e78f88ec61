//! The height-balanced DIET flavor.

use super::node::AvlDietNode;
use super::{blit_gaps, subtree_contains, subtree_span};
use crate::arena::{Arena, NodeId, SENTINEL};
use crate::coordinate::Coordinate;
use crate::error::InsertError;
use crate::interval::Interval;
use crate::traversal::InorderIter;
use std::fmt::{Debug, Formatter};

/// A node may outgrow its sibling by this much before a rotation restitches
/// the subtree.
const BAL_CONST: u16 = 1;

/// An AVL-balanced Discrete Interval Encoding Tree.
///
/// Stores the same maximal isolated intervals as [`Diet`](crate::Diet) and
/// emits the same `blit` ranges, but keeps the tree height-balanced so that
/// insertion and membership stay O(log n) regardless of insertion order.
///
/// Restructuring allocates fresh nodes instead of mutating reachable ones;
/// superseded records linger in the arena until [`AvlDiet::clear`]. That
/// also makes insertion transactional: a capacity failure mid-restructure
/// leaves the previous root, and with it the stored set, fully intact.
pub struct AvlDiet<T>
where
    T: Coordinate,
{
    arena: Arena<AvlDietNode<T>>,
    root: NodeId,
}

impl<T> AvlDiet<T>
where
    T: Coordinate,
{
    /// Creates an empty set bounded only by the handle range.
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: SENTINEL,
        }
    }

    /// Creates an empty set whose arena holds at most `limit` nodes.
    ///
    /// Restructuring consumes arena slots too, so the limit bounds total
    /// allocations rather than stored intervals.
    pub fn with_node_limit(limit: usize) -> Self {
        Self {
            arena: Arena::with_limit(limit),
            root: SENTINEL,
        }
    }

    /// Extends the stored set by every integer in `interval`.
    ///
    /// Same contract as [`Diet::insert`](crate::Diet::insert): `blit`
    /// covers exactly the previously-absent integers of the range.
    pub fn insert<I, F>(&mut self, interval: I, mut blit: F) -> Result<(), InsertError>
    where
        I: Into<Interval<T>>,
        F: FnMut(T, T),
    {
        let interval = interval.into();
        if interval.is_inverted() {
            return Err(InsertError::InvertedInterval);
        }

        let root = self.insert_range(self.root, interval.low, interval.high, &mut blit)?;
        self.root = root;
        Ok(())
    }

    /// Whether `value` is covered by the stored set.
    pub fn contains(&self, value: T) -> bool {
        subtree_contains(&self.arena, self.root, value)
    }

    /// Iterates the stored maximal intervals in ascending order.
    pub fn intervals(&self) -> impl Iterator<Item = Interval<T>> + '_ {
        InorderIter::new(&self.arena, self.root).map(move |id| self.arena[id].interval)
    }

    /// The covered hull `[lowest, highest]`, or `None` when empty.
    pub fn span(&self) -> Option<Interval<T>> {
        subtree_span(&self.arena, self.root)
    }

    /// The number of stored maximal intervals. O(n).
    pub fn len(&self) -> usize {
        self.intervals().count()
    }

    pub fn is_empty(&self) -> bool {
        self.root == SENTINEL
    }

    /// Removes all stored integers in O(1), reclaiming superseded nodes.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = SENTINEL;
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn arena(&self) -> &Arena<AvlDietNode<T>> {
        &self.arena
    }

    fn height(&self, t: NodeId) -> u16 {
        if t == SENTINEL {
            0
        } else {
            self.arena[t].height
        }
    }

    fn new_node(
        &mut self,
        interval: Interval<T>,
        height: u16,
        left: NodeId,
        right: NodeId,
    ) -> Result<NodeId, InsertError> {
        self.arena.alloc(AvlDietNode {
            interval,
            height,
            left,
            right,
        })
    }

    /// Builds a node over two subtrees already within the balance bound.
    fn create(
        &mut self,
        interval: Interval<T>,
        left: NodeId,
        right: NodeId,
    ) -> Result<NodeId, InsertError> {
        let height = 1 + self.height(left).max(self.height(right));
        self.new_node(interval, height, left, right)
    }

    /// Builds a node over subtrees whose heights differ by at most one
    /// rotation's worth, restitching with a single or double rotation when
    /// one side exceeds the other by more than `BAL_CONST`.
    fn balance(
        &mut self,
        interval: Interval<T>,
        left: NodeId,
        right: NodeId,
    ) -> Result<NodeId, InsertError> {
        let hl = self.height(left);
        let hr = self.height(right);

        if hl > hr + BAL_CONST {
            // hl >= 2, so the left child exists.
            let l = &self.arena[left];
            let (li, ll, lr) = (l.interval, l.left, l.right);

            if self.height(ll) >= self.height(lr) {
                let pivot = self.create(interval, lr, right)?;
                self.create(li, ll, pivot)
            } else {
                // Zig-zag: the inner grandchild is taller; destructure it.
                let inner = &self.arena[lr];
                let (ii, il, ir) = (inner.interval, inner.left, inner.right);

                let a = self.create(li, ll, il)?;
                let b = self.create(interval, ir, right)?;
                self.create(ii, a, b)
            }
        } else if hr > hl + BAL_CONST {
            let r = &self.arena[right];
            let (ri, rl, rr) = (r.interval, r.left, r.right);

            if self.height(rr) >= self.height(rl) {
                let pivot = self.create(interval, left, rl)?;
                self.create(ri, pivot, rr)
            } else {
                let inner = &self.arena[rl];
                let (ii, il, ir) = (inner.interval, inner.left, inner.right);

                let a = self.create(interval, left, il)?;
                let b = self.create(ri, ir, rr)?;
                self.create(ii, a, b)
            }
        } else {
            let height = hl.max(hr) + 1;
            self.new_node(interval, height, left, right)
        }
    }

    /// Inserts `interval` at the leftmost or rightmost position of `t`,
    /// rebalancing on the way back up. Only called with intervals that are
    /// isolated from everything stored in `t`.
    fn add_extreme(
        &mut self,
        t: NodeId,
        on_left: bool,
        interval: Interval<T>,
    ) -> Result<NodeId, InsertError> {
        if t == SENTINEL {
            return self.new_node(interval, 1, SENTINEL, SENTINEL);
        }

        let node = &self.arena[t];
        let (ni, left, right) = (node.interval, node.left, node.right);

        if on_left {
            let new_left = self.add_extreme(left, on_left, interval)?;
            self.balance(ni, new_left, right)
        } else {
            let new_right = self.add_extreme(right, on_left, interval)?;
            self.balance(ni, left, new_right)
        }
    }

    /// Produces a balanced tree whose inorder is
    /// `inorder(left) ++ [interval] ++ inorder(right)`, descending the
    /// taller side until the height difference is within bounds.
    fn join(
        &mut self,
        interval: Interval<T>,
        left: NodeId,
        right: NodeId,
    ) -> Result<NodeId, InsertError> {
        if left == SENTINEL {
            return self.add_extreme(right, true, interval);
        }
        if right == SENTINEL {
            return self.add_extreme(left, false, interval);
        }

        let l = &self.arena[left];
        let (li, lh, ll, lr) = (l.interval, l.height, l.left, l.right);
        let r = &self.arena[right];
        let (ri, rh, rl, rr) = (r.interval, r.height, r.left, r.right);

        if lh > rh + BAL_CONST {
            let joined = self.join(interval, lr, right)?;
            self.balance(li, ll, joined)
        } else if rh > lh + BAL_CONST {
            let joined = self.join(interval, left, rl)?;
            self.balance(ri, joined, rr)
        } else {
            self.create(interval, left, right)
        }
    }

    fn insert_range<F>(
        &mut self,
        t: NodeId,
        low: T,
        high: T,
        blit: &mut F,
    ) -> Result<NodeId, InsertError>
    where
        F: FnMut(T, T),
    {
        if t == SENTINEL {
            blit(low, high);
            return self.new_node(Interval::new(low, high), 1, SENTINEL, SENTINEL);
        }

        let node = &self.arena[t];
        let Interval { low: s, high: e } = node.interval;
        let (left, right) = (node.left, node.right);

        if high < s.pred() {
            let new_left = self.insert_range(left, low, high, blit)?;
            self.join(Interval::new(s, e), new_left, right)
        } else if low > e.succ() {
            let new_right = self.insert_range(right, low, high, blit)?;
            self.join(Interval::new(s, e), left, new_right)
        } else {
            // The range meets or touches this node.
            if low >= s && high <= e {
                // Fully covered already; nothing new to report.
                return Ok(t);
            }

            let (new_low, new_left) = if low >= s {
                (s, left)
            } else {
                self.find_del_left(left, low, s.pred(), blit)?
            };

            let (new_high, new_right) = if high <= e {
                (e, right)
            } else {
                self.find_del_right(right, high, e.succ(), blit)?
            };

            self.join(Interval::new(new_low, new_high), new_left, new_right)
        }
    }

    /// Pushes the insertion's low endpoint down into `t`; see the
    /// unbalanced counterpart for the gap-emission contract. Reattachment
    /// goes through [`Self::join`] so the surviving subtree stays balanced.
    fn find_del_left<F>(
        &mut self,
        t: NodeId,
        low: T,
        blit_to: T,
        blit: &mut F,
    ) -> Result<(T, NodeId), InsertError>
    where
        F: FnMut(T, T),
    {
        if t == SENTINEL {
            blit(low, blit_to);
            return Ok((low, SENTINEL));
        }

        let node = &self.arena[t];
        let Interval { low: s, high: e } = node.interval;
        let (left, right) = (node.left, node.right);

        if low > e.succ() {
            let (new_low, new_right) = self.find_del_left(right, low, blit_to, blit)?;
            let joined = self.join(Interval::new(s, e), left, new_right)?;
            Ok((new_low, joined))
        } else if low < s {
            blit_gaps(&self.arena, right, e.succ(), blit_to, blit);
            self.find_del_left(left, low, s.pred(), blit)
        } else {
            blit_gaps(&self.arena, right, e.succ(), blit_to, blit);
            Ok((s, left))
        }
    }

    fn find_del_right<F>(
        &mut self,
        t: NodeId,
        high: T,
        blit_from: T,
        blit: &mut F,
    ) -> Result<(T, NodeId), InsertError>
    where
        F: FnMut(T, T),
    {
        if t == SENTINEL {
            blit(blit_from, high);
            return Ok((high, SENTINEL));
        }

        let node = &self.arena[t];
        let Interval { low: s, high: e } = node.interval;
        let (left, right) = (node.left, node.right);

        if high < s.pred() {
            let (new_high, new_left) = self.find_del_right(left, high, blit_from, blit)?;
            let joined = self.join(Interval::new(s, e), new_left, right)?;
            Ok((new_high, joined))
        } else if high > e {
            blit_gaps(&self.arena, left, blit_from, s.pred(), blit);
            self.find_del_right(right, high, e.succ(), blit)
        } else {
            blit_gaps(&self.arena, left, blit_from, s.pred(), blit);
            Ok((e, right))
        }
    }
}

impl<T> Default for AvlDiet<T>
where
    T: Coordinate,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for AvlDiet<T>
where
    T: Coordinate,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.intervals()).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn collect_blits(set: &mut AvlDiet<i32>, low: i32, high: i32) -> Vec<(i32, i32)> {
        let mut blits = Vec::new();
        set.insert((low, high), |a, b| blits.push((a, b))).unwrap();
        blits
    }

    #[test]
    fn ascending_fill_stays_shallow() {
        let mut set = AvlDiet::new();
        for low in 0..64 {
            // Leave a gap of one so nothing coalesces.
            collect_blits(&mut set, low * 2, low * 2);
        }
        assert_eq!(set.len(), 64);
        set.assert_invariants();
        // A degenerate spine would be 64 levels deep.
        assert!(set.arena[set.root].height <= 8);
    }

    #[test]
    fn descending_fill_stays_shallow() {
        let mut set = AvlDiet::new();
        for low in (0..64).rev() {
            collect_blits(&mut set, low * 2, low * 2);
        }
        assert_eq!(set.len(), 64);
        set.assert_invariants();
        assert!(set.arena[set.root].height <= 8);
    }

    #[test]
    fn bridging_insert_coalesces_across_subtrees() {
        let mut set = AvlDiet::new();
        for low in &[1, 7, 13, 19, 24] {
            collect_blits(&mut set, *low, low + 2);
        }

        let mut blits = collect_blits(&mut set, 2, 25);
        blits.sort_unstable();
        assert_eq!(blits, vec![(4, 6), (10, 12), (16, 18), (22, 23)]);
        assert_eq!(set.intervals().collect::<Vec<_>>(), vec![(1, 26).into()]);
        set.assert_invariants();
    }

    #[test]
    fn overshooting_a_leaf_blits_the_tail() {
        let mut set = AvlDiet::new();
        for iv in &[(14, 15), (10, 11), (6, 7), (2, 4)] {
            collect_blits(&mut set, iv.0, iv.1);
        }

        let mut blits = collect_blits(&mut set, 3, 16);
        blits.sort_unstable();
        assert_eq!(blits, vec![(5, 5), (8, 9), (12, 13), (16, 16)]);
        assert_eq!(set.intervals().collect::<Vec<_>>(), vec![(2, 16).into()]);
        set.assert_invariants();
    }

    #[test]
    fn covered_insert_is_idempotent() {
        let mut set = AvlDiet::new();
        collect_blits(&mut set, 1, 10);
        let allocated = set.arena.len();
        assert_eq!(collect_blits(&mut set, 3, 7), vec![]);
        assert_eq!(set.arena.len(), allocated);
        assert_eq!(set.intervals().collect::<Vec<_>>(), vec![(1, 10).into()]);
    }

    #[test]
    fn full_arena_leaves_the_stored_set_intact() {
        // Restructuring allocates, so two disjoint inserts burn four slots:
        // two leaves plus the rebuilt pair from the join.
        let mut set = AvlDiet::with_node_limit(4);
        collect_blits(&mut set, 1, 2);
        collect_blits(&mut set, 7, 8);
        let before: Vec<_> = set.intervals().collect();

        let result = set.insert((13, 14), |_, _| {});
        assert_eq!(result, Err(InsertError::ArenaFull));
        assert_eq!(set.intervals().collect::<Vec<_>>(), before);
        set.assert_invariants();
    }

    #[test]
    fn inverted_interval_is_rejected() {
        let mut set: AvlDiet<i32> = AvlDiet::new();
        let result = set.insert((4, 1), |_, _| panic!("must not blit"));
        assert_eq!(result, Err(InsertError::InvertedInterval));
        assert!(set.is_empty());
    }
}
