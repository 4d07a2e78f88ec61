//! Discrete Interval Encoding Trees.
//!
//! A DIET stores a set of integers as binary-search-tree nodes holding
//! maximal closed intervals: no two stored intervals overlap or sit
//! adjacent by one unit. Range insertion coalesces everything it bridges
//! and reports each previously-absent integer exactly once through a
//! `blit` callback.
//!
//! Two flavors share the insertion recursion: [`Diet`] mutates nodes in
//! place and performs no rebalancing; [`AvlDiet`] is height-balanced and
//! restructures by allocating fresh nodes.

mod avl;
mod checks;
mod node;

pub use avl::AvlDiet;

use crate::arena::{Arena, NodeId, SENTINEL};
use crate::coordinate::Coordinate;
use crate::error::InsertError;
use crate::interval::Interval;
use crate::traversal::InorderIter;
use node::{DietNode, IntervalNode};
use std::fmt::{Debug, Formatter};

/// Emits the gaps (cells not covered by `t`'s intervals) of the closed
/// window `[from, to]`. Every interval of `t` must lie inside the window;
/// this holds for the absorbed subtrees the insertion recursion hands in,
/// because stored intervals are isolated.
pub(crate) fn blit_gaps<T, N, F>(arena: &Arena<N>, t: NodeId, from: T, to: T, blit: &mut F)
where
    T: Coordinate,
    N: IntervalNode<T>,
    F: FnMut(T, T),
{
    if from > to {
        return;
    }
    if t == SENTINEL {
        blit(from, to);
        return;
    }

    let node = &arena[t];
    let interval = node.interval();
    blit_gaps(arena, node.left(), from, interval.low.pred(), blit);
    blit_gaps(arena, node.right(), interval.high.succ(), to, blit);
}

/// BST descent for point membership, shared by both flavors.
pub(crate) fn subtree_contains<T, N>(arena: &Arena<N>, root: NodeId, value: T) -> bool
where
    T: Coordinate,
    N: IntervalNode<T>,
{
    let mut x = root;
    while x != SENTINEL {
        let interval = arena[x].interval();
        if value < interval.low {
            x = arena[x].left();
        } else if value > interval.high {
            x = arena[x].right();
        } else {
            return true;
        }
    }
    false
}

/// The covered hull `[leftmost low, rightmost high]`, if anything is stored.
pub(crate) fn subtree_span<T, N>(arena: &Arena<N>, root: NodeId) -> Option<Interval<T>>
where
    T: Coordinate,
    N: IntervalNode<T>,
{
    if root == SENTINEL {
        return None;
    }

    let mut x = root;
    while arena[x].left() != SENTINEL {
        x = arena[x].left();
    }
    let low = arena[x].interval().low;

    let mut x = root;
    while arena[x].right() != SENTINEL {
        x = arena[x].right();
    }
    let high = arena[x].interval().high;

    Some(Interval::new(low, high))
}

/// An unbalanced Discrete Interval Encoding Tree.
///
/// Nodes are mutated in place; the tree's shape depends on insertion order
/// and can degenerate to a spine, but the stored set is always the union of
/// everything inserted, held as maximal isolated intervals.
///
/// # Example
/// ```rust
/// use interval_trees::Diet;
///
/// let mut set = Diet::new();
/// let mut fresh = Vec::new();
/// set.insert((2, 2), |a, b| fresh.push((a, b))).unwrap();
/// set.insert((4, 4), |a, b| fresh.push((a, b))).unwrap();
/// // Bridges both singletons; only 3 is newly covered.
/// set.insert((2, 4), |a, b| fresh.push((a, b))).unwrap();
///
/// assert_eq!(fresh, vec![(2, 2), (4, 4), (3, 3)]);
/// assert!(set.contains(3));
/// assert_eq!(set.len(), 1);
/// ```
pub struct Diet<T>
where
    T: Coordinate,
{
    arena: Arena<DietNode<T>>,
    root: NodeId,
}

impl<T> Diet<T>
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
    pub fn with_node_limit(limit: usize) -> Self {
        Self {
            arena: Arena::with_limit(limit),
            root: SENTINEL,
        }
    }

    /// Extends the stored set by every integer in `interval`.
    ///
    /// `blit` is invoked with closed sub-ranges that together cover exactly
    /// the integers of `interval` that were absent before the call; already
    /// covered integers are never reported. Inserting a fully covered range
    /// emits nothing and leaves the tree untouched.
    ///
    /// On error the stored set is unchanged, though `blit` calls emitted
    /// before the failure are not retracted.
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

    /// The number of stored maximal intervals. O(n): absorbed nodes stay in
    /// the arena, so the tree has to be walked.
    pub fn len(&self) -> usize {
        self.intervals().count()
    }

    pub fn is_empty(&self) -> bool {
        self.root == SENTINEL
    }

    /// Removes all stored integers in O(1).
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = SENTINEL;
    }

    fn insert_range<F>(
        &mut self,
        x: NodeId,
        low: T,
        high: T,
        blit: &mut F,
    ) -> Result<NodeId, InsertError>
    where
        F: FnMut(T, T),
    {
        if x == SENTINEL {
            blit(low, high);
            return self.arena.alloc(DietNode::new(Interval::new(low, high)));
        }

        let Interval { low: s, high: e } = self.arena[x].interval;

        if high < s.pred() {
            // Disjoint and not adjacent; the insertion happens further left.
            let left = self.arena[x].left;
            let new_left = self.insert_range(left, low, high, blit)?;
            self.arena[x].left = new_left;
            return Ok(x);
        }
        if low > e.succ() {
            let right = self.arena[x].right;
            let new_right = self.insert_range(right, low, high, blit)?;
            self.arena[x].right = new_right;
            return Ok(x);
        }

        // The range meets or touches this node.
        if low >= s && high <= e {
            // Fully covered already; nothing new to report.
            return Ok(x);
        }

        let (new_low, new_left) = if low >= s {
            (s, self.arena[x].left)
        } else {
            let left = self.arena[x].left;
            self.find_del_left(left, low, s.pred(), blit)
        };

        let (new_high, new_right) = if high <= e {
            (e, self.arena[x].right)
        } else {
            let right = self.arena[x].right;
            self.find_del_right(right, high, e.succ(), blit)
        };

        let node = &mut self.arena[x];
        node.interval = Interval::new(new_low, new_high);
        node.left = new_left;
        node.right = new_right;
        Ok(x)
    }

    /// Pushes the insertion's low endpoint down into `t`, absorbing every
    /// interval it meets or bridges. Returns the merged low endpoint and
    /// the subtree that survives to the left of it. Gaps between absorbed
    /// intervals, up to `blit_to`, are emitted along the way.
    fn find_del_left<F>(&mut self, t: NodeId, low: T, blit_to: T, blit: &mut F) -> (T, NodeId)
    where
        F: FnMut(T, T),
    {
        if t == SENTINEL {
            // Ran off the tree: everything from the raw endpoint up to the
            // window edge was uncovered.
            blit(low, blit_to);
            return (low, SENTINEL);
        }

        let Interval { low: s, high: e } = self.arena[t].interval;

        if low > e.succ() {
            // The endpoint lies beyond this node rightwards; this node and
            // everything left of it survive unchanged.
            let right = self.arena[t].right;
            let (new_low, new_right) = self.find_del_left(right, low, blit_to, blit);
            self.arena[t].right = new_right;
            (new_low, t)
        } else if low < s {
            // Node fully absorbed, along with its right subtree; report the
            // right subtree's gaps and keep pushing left.
            let right = self.arena[t].right;
            blit_gaps(&self.arena, right, e.succ(), blit_to, blit);
            let left = self.arena[t].left;
            self.find_del_left(left, low, s.pred(), blit)
        } else {
            // s <= low <= e + 1: this node's low survives as the merged
            // low; everything above it inside the window was absorbed.
            let right = self.arena[t].right;
            blit_gaps(&self.arena, right, e.succ(), blit_to, blit);
            (s, self.arena[t].left)
        }
    }

    /// Mirror image of [`Self::find_del_left`] for the high endpoint;
    /// `blit_from` advances upward past each absorbed interval.
    fn find_del_right<F>(&mut self, t: NodeId, high: T, blit_from: T, blit: &mut F) -> (T, NodeId)
    where
        F: FnMut(T, T),
    {
        if t == SENTINEL {
            blit(blit_from, high);
            return (high, SENTINEL);
        }

        let Interval { low: s, high: e } = self.arena[t].interval;

        if high < s.pred() {
            let left = self.arena[t].left;
            let (new_high, new_left) = self.find_del_right(left, high, blit_from, blit);
            self.arena[t].left = new_left;
            (new_high, t)
        } else if high > e {
            let left = self.arena[t].left;
            blit_gaps(&self.arena, left, blit_from, s.pred(), blit);
            let right = self.arena[t].right;
            self.find_del_right(right, high, e.succ(), blit)
        } else {
            let left = self.arena[t].left;
            blit_gaps(&self.arena, left, blit_from, s.pred(), blit);
            (e, self.arena[t].right)
        }
    }
}

impl<T> Default for Diet<T>
where
    T: Coordinate,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for Diet<T>
where
    T: Coordinate,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.intervals()).finish()
    }
}
