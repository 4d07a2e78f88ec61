use crate::arena::{NodeId, SENTINEL};
use crate::coordinate::Coordinate;
use crate::interval::Interval;
use crate::traversal::BinaryNode;
use std::fmt::{Debug, Formatter};

/// A node carrying one maximal stored interval. Shared by the verifiers
/// and traversals of both DIET flavors.
pub(crate) trait IntervalNode<T>: BinaryNode
where
    T: Coordinate,
{
    fn interval(&self) -> Interval<T>;
}

/// Node of the unbalanced DIET. No parent link, no height; the insertion
/// recursion rewires and overwrites nodes in place.
pub(crate) struct DietNode<T>
where
    T: Coordinate,
{
    pub(crate) interval: Interval<T>,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
}

impl<T> DietNode<T>
where
    T: Coordinate,
{
    pub(crate) fn new(interval: Interval<T>) -> Self {
        Self {
            interval,
            left: SENTINEL,
            right: SENTINEL,
        }
    }
}

impl<T> BinaryNode for DietNode<T>
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

impl<T> IntervalNode<T> for DietNode<T>
where
    T: Coordinate,
{
    fn interval(&self) -> Interval<T> {
        self.interval
    }
}

impl<T> Debug for DietNode<T>
where
    T: Coordinate,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.interval)
    }
}

/// Node of the AVL-balanced DIET. Restructuring allocates fresh nodes, so
/// records are immutable once written.
pub(crate) struct AvlDietNode<T>
where
    T: Coordinate,
{
    pub(crate) interval: Interval<T>,
    pub(crate) height: u16,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
}

impl<T> BinaryNode for AvlDietNode<T>
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

impl<T> IntervalNode<T> for AvlDietNode<T>
where
    T: Coordinate,
{
    fn interval(&self) -> Interval<T> {
        self.interval
    }
}

impl<T> Debug for AvlDietNode<T>
where
    T: Coordinate,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} h = {}", self.interval, self.height)
    }
}
