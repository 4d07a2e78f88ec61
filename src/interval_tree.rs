// https://www.geeksforgeeks.org/interval-tree/

mod checks;
mod node;

use crate::arena::{Arena, NodeId, SENTINEL};
use crate::coordinate::Coordinate;
use crate::error::InsertError;
use crate::interval::Interval;
use crate::traversal::InorderIter;
use node::IntervalTreeNode;
use smallvec::SmallVec;
use std::fmt::{Debug, Formatter};

/// An AVL-balanced interval search tree.
///
/// Intervals are kept in binary-search-tree order on their low endpoint
/// (equal lows go right) and every node carries the maximum high endpoint
/// of its subtree, which prunes overlap queries to O(log n) descent per
/// reported match. Rebalancing mutates nodes in place along the insertion
/// path.
///
/// # Example
/// ```rust
/// use interval_trees::IntervalTree;
///
/// let mut tree = IntervalTree::new();
/// tree.insert((15, 20)).unwrap();
/// tree.insert((10, 30)).unwrap();
/// tree.insert((5, 8)).unwrap();
///
/// let hit = tree.search((6, 7)).unwrap();
/// assert_eq!(*tree.interval(hit), (5, 8).into());
/// assert_eq!(tree.search((40, 41)), None);
/// ```
pub struct IntervalTree<T>
where
    T: Coordinate,
{
    arena: Arena<IntervalTreeNode<T>>,
    root: NodeId,
}

impl<T> IntervalTree<T>
where
    T: Coordinate,
{
    /// Creates an empty tree bounded only by the handle range.
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: SENTINEL,
        }
    }

    /// Creates an empty tree that holds at most `limit` intervals.
    pub fn with_node_limit(limit: usize) -> Self {
        Self {
            arena: Arena::with_limit(limit),
            root: SENTINEL,
        }
    }

    /// Gets the number of intervals stored.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Removes all intervals in O(1).
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = SENTINEL;
    }

    /// Gets the interval stored behind a handle.
    pub fn interval(&self, id: NodeId) -> &Interval<T> {
        &self.arena[id].interval
    }

    /// Inserts a new interval and returns its handle.
    ///
    /// The node is allocated before any link is touched, so a full arena
    /// leaves the tree unchanged.
    pub fn insert<I>(&mut self, interval: I) -> Result<NodeId, InsertError>
    where
        I: Into<Interval<T>>,
    {
        let interval = interval.into();
        if interval.is_inverted() {
            return Err(InsertError::InvertedInterval);
        }

        let n = self.arena.alloc(IntervalTreeNode::new(interval))?;
        if self.root == SENTINEL {
            self.root = n;
            return Ok(n);
        }

        // BST descent on the low endpoint; equal lows go right.
        let mut x = self.root;
        let mut p = SENTINEL;
        while x != SENTINEL {
            p = x;
            x = if interval.low < self.arena[x].interval.low {
                self.arena[x].left
            } else {
                self.arena[x].right
            };
        }

        if interval.low < self.arena[p].interval.low {
            self.arena[p].left = n;
        } else {
            self.arena[p].right = n;
        }
        self.arena[n].parent = p;

        // Walk back to the root, refreshing the augmented fields and
        // rotating wherever the balance factor left {-1, 0, 1}.
        let mut x = n;
        while self.arena[x].parent != SENTINEL {
            x = self.arena[x].parent;
            x = self.balance(x);
        }
        self.root = x;

        Ok(n)
    }

    /// Searches for any interval overlapping the query, returning its
    /// handle, or `None` if nothing overlaps.
    pub fn search<I>(&self, interval: I) -> Option<NodeId>
    where
        I: Into<Interval<T>>,
    {
        let query = interval.into();

        let mut x = self.root;
        while x != SENTINEL && !self.arena[x].interval.overlaps_with(&query) {
            // The left subtree can only contain an overlap if some interval
            // in it ends at or after the query's start.
            let left = self.arena[x].left;
            x = if left != SENTINEL && self.arena[left].max >= query.low {
                left
            } else {
                self.arena[x].right
            };
        }

        if x == SENTINEL {
            None
        } else {
            Some(x)
        }
    }

    /// Collects the handles of every stored interval overlapping the query,
    /// in preorder.
    pub fn find_all_overlapping<I>(&self, interval: I) -> SmallVec<[NodeId; 16]>
    where
        I: Into<Interval<T>>,
    {
        let query = interval.into();
        let mut results = SmallVec::new();
        self.collect_overlapping(self.root, &query, &mut results);
        results
    }

    fn collect_overlapping(
        &self,
        x: NodeId,
        query: &Interval<T>,
        results: &mut SmallVec<[NodeId; 16]>,
    ) {
        if x == SENTINEL {
            return;
        }

        let node = &self.arena[x];
        if node.interval.overlaps_with(query) {
            results.push(x);
        }

        // A subtree whose max ends before the query starts cannot overlap.
        if node.left != SENTINEL && self.arena[node.left].max >= query.low {
            self.collect_overlapping(node.left, query, results);
        }
        if node.right != SENTINEL && self.arena[node.right].max >= query.low {
            self.collect_overlapping(node.right, query, results);
        }
    }

    /// Iterates the stored handles in-order, i.e. earlier-starting
    /// intervals first.
    pub fn iter_inorder(&self) -> impl Iterator<Item = NodeId> + '_ {
        InorderIter::new(&self.arena, self.root)
    }

    fn height(&self, x: NodeId) -> u16 {
        if x == SENTINEL {
            0
        } else {
            self.arena[x].height
        }
    }

    /// Balance factor: height(right) - height(left).
    fn diff(&self, x: NodeId) -> i32 {
        i32::from(self.height(self.arena[x].right)) - i32::from(self.height(self.arena[x].left))
    }

    fn update_height(&mut self, x: NodeId) {
        let lh = self.height(self.arena[x].left);
        let rh = self.height(self.arena[x].right);
        self.arena[x].height = 1 + lh.max(rh);
    }

    fn update_max(&mut self, x: NodeId) {
        let left = self.arena[x].left;
        let right = self.arena[x].right;

        let lm = if left == SENTINEL {
            T::MIN_COORD
        } else {
            self.arena[left].max
        };
        let rm = if right == SENTINEL {
            T::MIN_COORD
        } else {
            self.arena[right].max
        };

        self.arena[x].max = self.arena[x].interval.high.max(lm).max(rm);
    }

    fn rotate_right(&mut self, x: NodeId) -> NodeId {
        let y = self.arena[x].left;
        let y_right = self.arena[y].right;

        self.arena[x].left = y_right;
        if y_right != SENTINEL {
            self.arena[y_right].parent = x;
        }

        let p = self.arena[x].parent;
        self.arena[y].parent = p;
        if p == SENTINEL {
            self.root = y;
        } else if x == self.arena[p].left {
            self.arena[p].left = y;
        } else {
            self.arena[p].right = y;
        }

        self.arena[y].right = x;
        self.arena[x].parent = y;

        // Heights before maxes, the lowered node before its new parent.
        self.update_height(x);
        self.update_height(y);
        self.update_max(x);
        self.update_max(y);

        y
    }

    fn rotate_left(&mut self, x: NodeId) -> NodeId {
        let y = self.arena[x].right;
        let y_left = self.arena[y].left;

        self.arena[x].right = y_left;
        if y_left != SENTINEL {
            self.arena[y_left].parent = x;
        }

        let p = self.arena[x].parent;
        self.arena[y].parent = p;
        if p == SENTINEL {
            self.root = y;
        } else if x == self.arena[p].left {
            self.arena[p].left = y;
        } else {
            self.arena[p].right = y;
        }

        self.arena[y].left = x;
        self.arena[x].parent = y;

        self.update_height(x);
        self.update_height(y);
        self.update_max(x);
        self.update_max(y);

        y
    }

    /// Restores the AVL invariant at `x`, returning the subtree's new root.
    fn balance(&mut self, x: NodeId) -> NodeId {
        let d = self.diff(x);

        if d > 1 {
            if self.diff(self.arena[x].right) < 0 {
                let right = self.arena[x].right;
                let new_right = self.rotate_right(right);
                self.arena[x].right = new_right;
            }
            return self.rotate_left(x);
        }

        if d < -1 {
            if self.diff(self.arena[x].left) > 0 {
                let left = self.arena[x].left;
                let new_left = self.rotate_left(left);
                self.arena[x].left = new_left;
            }
            return self.rotate_right(x);
        }

        self.update_height(x);
        self.update_max(x);
        x
    }
}

impl<T> Default for IntervalTree<T>
where
    T: Coordinate,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for IntervalTree<T>
where
    T: Coordinate,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.iter_inorder().map(|id| &self.arena[id]))
            .finish()
    }
}

impl<T, I> std::iter::FromIterator<I> for IntervalTree<T>
where
    I: Into<Interval<T>>,
    T: Coordinate,
{
    fn from_iter<Iter>(iter: Iter) -> Self
    where
        Iter: IntoIterator<Item = I>,
    {
        let mut tree = Self::new();
        for interval in iter.into_iter() {
            tree.insert(interval).expect("insert should work");
        }
        tree
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use std::iter::FromIterator;

    /// Constructs a test tree.
    pub(crate) fn construct_test_tree() -> IntervalTree<i32> {
        IntervalTree::from_iter([
            (15, 20),
            (10, 30),
            (17, 19),
            (5, 20),
            (12, 15),
            (30, 40),
        ])
    }

    #[test]
    fn overlap_search_works() {
        let tree = construct_test_tree();
        let overlap = tree.search((6, 7)).map(|id| *tree.interval(id));
        assert_eq!(overlap, Some(Interval::new(5, 20)));
    }

    #[test]
    fn len_works() {
        let tree = construct_test_tree();
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn search_misses_outside_the_span() {
        let tree = construct_test_tree();
        assert_eq!(tree.search((41, 50)), None);
        assert_eq!(tree.search((1, 4)), None);
    }

    #[test]
    fn iteration_is_ordered_by_low() {
        let tree = construct_test_tree();
        let lows: Vec<i32> = tree.iter_inorder().map(|id| tree.interval(id).low).collect();
        assert_eq!(lows, vec![5, 10, 12, 15, 17, 30]);
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let mut tree = IntervalTree::new();
        for low in 1..=128 {
            tree.insert((low, low + 3)).unwrap();
        }
        tree.assert_invariants();
        // A degenerate spine would be 128 levels deep.
        assert!(tree.height(tree.root) <= 9);
    }

    #[test]
    fn descending_inserts_stay_balanced() {
        let mut tree = IntervalTree::new();
        for low in (1..=128).rev() {
            tree.insert((low, low + 3)).unwrap();
        }
        tree.assert_invariants();
        assert!(tree.height(tree.root) <= 9);
    }

    #[test]
    fn inverted_interval_is_rejected() {
        let mut tree = IntervalTree::new();
        assert_eq!(tree.insert((5, 2)), Err(InsertError::InvertedInterval));
        assert!(tree.is_empty());
    }

    #[test]
    fn full_arena_leaves_the_tree_intact() {
        let mut tree = IntervalTree::with_node_limit(2);
        tree.insert((1, 2)).unwrap();
        tree.insert((4, 8)).unwrap();
        assert_eq!(tree.insert((10, 12)), Err(InsertError::ArenaFull));
        assert_eq!(tree.len(), 2);
        tree.assert_invariants();
    }

    #[test]
    fn clear_resets_to_empty() {
        let mut tree = construct_test_tree();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.search((0, 100)), None);
        tree.insert((1, 1)).unwrap();
        assert_eq!(tree.len(), 1);
    }
}
