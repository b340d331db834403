use crate::ibs_tree::interval_set::IntervalSet;
use crate::interval::IntervalBounds;

/// A child link in the endpoint tree.
pub(crate) type ChildNode<I> = Option<Box<Node<I>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A node of the endpoint tree: one endpoint value, the three
/// augmentation sets, and the overlap-depth bookkeeping.
///
/// `delta` is the change in overlap count when the scanline crosses
/// onto `key`; `delta_after` the change when it leaves `key`.
/// `sum` and `max` are the derived subtree aggregates: `sum` the net
/// contribution of the subtree, `max` the maximum prefix sum over the
/// subtree's in-order walk.
pub(crate) struct Node<I>
where
    I: IntervalBounds,
{
    pub key: I::Endpoint,
    pub less: IntervalSet<I>,
    pub equal: IntervalSet<I>,
    pub greater: IntervalSet<I>,
    pub left: ChildNode<I>,
    pub right: ChildNode<I>,
    pub color: Color,
    pub delta: i32,
    pub delta_after: i32,
    pub sum: i32,
    pub max: i32,
}

impl<I> Node<I>
where
    I: IntervalBounds,
{
    /// Creates a detached red node for a new endpoint.
    pub(crate) fn new(key: I::Endpoint) -> Self {
        Self {
            key,
            less: IntervalSet::new(),
            equal: IntervalSet::new(),
            greater: IntervalSet::new(),
            left: None,
            right: None,
            color: Color::Red,
            delta: 0,
            delta_after: 0,
            sum: 0,
            max: 0,
        }
    }

    /// Recomputes `sum` and `max` from the children and the local
    /// deltas. Must run on every node whose subtree changed, bottom-up.
    pub(crate) fn update_max(&mut self) {
        let left_sum = self.left.as_ref().map_or(0, |n| n.sum);
        let left_max = self.left.as_ref().map_or(0, |n| n.max);
        let right_sum = self.right.as_ref().map_or(0, |n| n.sum);
        let right_max = self.right.as_ref().map_or(0, |n| n.max);

        // Depth just past the key, then after leaving it.
        let mut depth = left_sum + self.delta;
        let best = left_max.max(depth);
        depth += self.delta_after;
        let best = best.max(depth);

        self.sum = depth + right_sum;
        self.max = best.max(depth + right_max);
    }
}

pub(crate) fn is_red<I>(node: &ChildNode<I>) -> bool
where
    I: IntervalBounds,
{
    node.as_ref().map_or(false, |n| n.color == Color::Red)
}

/// Rotates the red link at `n` to the left: `n.right` rises, `n`
/// becomes its left child.
///
/// The augmentation sets of both nodes are rewritten so that the
/// placement invariant keeps holding for the rotated shape: the old
/// root's `greater` members now also straddle the new root, and the
/// members of the rising child's `less` that do not cover the whole of
/// the old root's left flank migrate down into the old root's `less`.
pub(crate) fn rotate_left<I>(mut n: Box<Node<I>>) -> Box<Node<I>>
where
    I: IntervalBounds,
{
    let mut c = n.right.take().expect("rotate_left needs a right child");

    let migrated = c.less.difference(&n.less);
    c.greater.merge(&n.greater);
    c.equal.merge(&n.greater);
    c.less.subtract(&migrated);
    n.greater.merge(&migrated);
    n.equal.subtract(&c.less);
    n.less.subtract(&c.less);

    n.right = c.left.take();
    c.color = n.color;
    n.color = Color::Red;
    n.update_max();
    c.left = Some(n);
    c.update_max();
    c
}

/// Rotates the red link at `n` to the right: `n.left` rises, `n`
/// becomes its right child. Mirror image of [`rotate_left`].
pub(crate) fn rotate_right<I>(mut n: Box<Node<I>>) -> Box<Node<I>>
where
    I: IntervalBounds,
{
    let mut c = n.left.take().expect("rotate_right needs a left child");

    let migrated = c.greater.difference(&n.greater);
    c.less.merge(&n.less);
    c.equal.merge(&n.less);
    c.greater.subtract(&migrated);
    n.less.merge(&migrated);
    n.equal.subtract(&c.greater);
    n.greater.subtract(&c.greater);

    n.left = c.right.take();
    c.color = n.color;
    n.color = Color::Red;
    n.update_max();
    c.right = Some(n);
    c.update_max();
    c
}

/// Inverts the colors of a node and its children. Rotations never move
/// intervals across a color flip, so the sets stay untouched.
pub(crate) fn flip_colors<I>(node: &mut Node<I>)
where
    I: IntervalBounds,
{
    node.color = invert(node.color);
    if let Some(left) = &mut node.left {
        left.color = invert(left.color);
    }
    if let Some(right) = &mut node.right {
        right.color = invert(right.color);
    }
}

fn invert(color: Color) -> Color {
    match color {
        Color::Red => Color::Black,
        Color::Black => Color::Red,
    }
}

/// Restores the left-leaning invariants at `node` after a mutation in
/// one of its subtrees, then refreshes the depth aggregates.
pub(crate) fn fix_up<I>(mut node: Box<Node<I>>) -> Box<Node<I>>
where
    I: IntervalBounds,
{
    if is_red(&node.right) && !is_red(&node.left) {
        node = rotate_left(node);
    }
    if is_red(&node.left) && node.left.as_ref().map_or(false, |l| is_red(&l.left)) {
        node = rotate_right(node);
    }
    if is_red(&node.left) && is_red(&node.right) {
        flip_colors(&mut node);
    }
    node.update_max();
    node
}

/// Ensures the left child or one of its children is red before the
/// delete descent moves left.
pub(crate) fn move_red_left<I>(mut node: Box<Node<I>>) -> Box<Node<I>>
where
    I: IntervalBounds,
{
    flip_colors(&mut node);
    if node.right.as_ref().map_or(false, |r| is_red(&r.left)) {
        let right = node.right.take().expect("checked right child");
        node.right = Some(rotate_right(right));
        node = rotate_left(node);
        flip_colors(&mut node);
    }
    node
}

/// Ensures the right child or one of its children is red before the
/// delete descent moves right.
pub(crate) fn move_red_right<I>(mut node: Box<Node<I>>) -> Box<Node<I>>
where
    I: IntervalBounds,
{
    flip_colors(&mut node);
    if node.left.as_ref().map_or(false, |l| is_red(&l.left)) {
        node = rotate_right(node);
        flip_colors(&mut node);
    }
    node
}
