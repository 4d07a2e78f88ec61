use crate::arena::{NodeId, SENTINEL};
use crate::coordinate::Coordinate;
use crate::interval::Interval;
use crate::traversal::BinaryNode;
use std::fmt::{Debug, Formatter};

/// Structure to represent a node in an interval search tree.
///
/// `max` caches the largest `high` endpoint in the subtree rooted here; the
/// parent link is a back-reference index, not an ownership edge.
pub(crate) struct IntervalTreeNode<T>
where
    T: Coordinate,
{
    pub(crate) interval: Interval<T>,
    pub(crate) max: T,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) parent: NodeId,
    pub(crate) height: u16,
}

impl<T> IntervalTreeNode<T>
where
    T: Coordinate,
{
    /// A utility function to create a new interval search tree node.
    pub(crate) fn new(interval: Interval<T>) -> Self {
        Self {
            interval,
            max: interval.high,
            left: SENTINEL,
            right: SENTINEL,
            parent: SENTINEL,
            height: 1,
        }
    }
}

impl<T> BinaryNode for IntervalTreeNode<T>
where
    T: Coordinate,
{
    fn left(&self) -> NodeId {
        self.left
    }

    fn right(&self) -> NodeId {
        self.right
    }
}

impl<T> Debug for IntervalTreeNode<T>
where
    T: Coordinate,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} max = {:?}", self.interval, self.max)
    }
}
