use crate::ibs_tree::interval_set::{IntervalRef, IntervalSet};
use crate::ibs_tree::node::{
    fix_up, is_red, move_red_left, move_red_right, rotate_right, ChildNode, Color, Node,
};
use crate::ibs_tree::query::{collect_overlaps, collect_subtree, PointOverlaps};
use crate::ibs_tree::{EmptyCollection, Overlaps};
use crate::interval::{Interval, IntervalBounds};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// An interval binary search tree: a left-leaning red-black tree over
/// the endpoint values of a dynamic interval collection, augmented per
/// node with the `less`/`equal`/`greater` interval sets and with the
/// overlap-depth bookkeeping that makes the collection's maximum depth
/// a constant-time read.
///
/// Intervals are tracked by reference identity of their [`Rc`] handles:
/// two distinct handles with equal endpoints are distinct members, the
/// identical handle is never stored twice.
///
/// # Example
/// ```rust
/// use ibs_tree::IbsTree;
/// use ibs_tree::interval::Interval;
///
/// let tree = IbsTree::from_iter([
///     Interval::closed(1, 3),
///     Interval::closed(2, 4),
///     Interval::closed(5, 7),
/// ]);
///
/// let stabbed: Vec<_> = tree.find_overlaps_at(&2).collect();
/// assert_eq!(stabbed.len(), 2);
/// assert_eq!(tree.maximum_depth(), 2);
/// ```
pub struct IbsTree<I>
where
    I: IntervalBounds,
{
    root: ChildNode<I>,
    count: usize,
}

impl<I> Default for IbsTree<I>
where
    I: IntervalBounds,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<I> Debug for IbsTree<I>
where
    I: IntervalBounds,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IbsTree").field("count", &self.count).finish()
    }
}

impl<I> IbsTree<I>
where
    I: IntervalBounds,
{
    /// Reference-identical duplicates are never stored; a second `add`
    /// of the same handle reports `false`.
    pub const ALLOWS_REFERENCE_DUPLICATES: bool = false;

    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            root: None,
            count: 0,
        }
    }

    /// The number of intervals in the collection. O(1).
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Removes every interval.
    pub fn clear(&mut self) {
        self.root = None;
        self.count = 0;
    }

    /// Adds an interval handle. Returns `false` without changing the
    /// collection if the identical handle is already a member.
    pub fn add(&mut self, interval: IntervalRef<I>) -> bool {
        if self.contains(&interval) {
            return false;
        }

        let mut root = add_low(self.root.take(), None, &interval);
        root.color = Color::Black;
        let mut root = add_high(Some(root), None, &interval);
        root.color = Color::Black;
        self.root = Some(root);
        self.count += 1;
        true
    }

    /// Adds every handle of the sequence, skipping duplicates.
    pub fn add_all<T>(&mut self, intervals: T)
    where
        T: IntoIterator<Item = IntervalRef<I>>,
    {
        for interval in intervals {
            self.add(interval);
        }
    }

    /// Removes an interval handle by identity. Returns `false` if the
    /// handle was not a member.
    pub fn remove(&mut self, interval: &IntervalRef<I>) -> bool {
        if !self.contains(interval) {
            return false;
        }

        remove_low(&mut self.root, None, interval);
        remove_high(&mut self.root, None, interval);

        let low = interval.low();
        let high = interval.high();
        self.collect_endpoint(&low);
        if high != low {
            self.collect_endpoint(&high);
        }

        self.count -= 1;
        true
    }

    /// Tests membership by reference identity. Every member is visible
    /// in the augmentation sets of at least one of its endpoint nodes.
    pub fn contains(&self, interval: &IntervalRef<I>) -> bool {
        self.endpoint_sets_contain(&interval.low(), interval)
            || self.endpoint_sets_contain(&interval.high(), interval)
    }

    /// Returns an arbitrary member of the collection.
    pub fn choose(&self) -> Result<IntervalRef<I>, EmptyCollection> {
        self.lowest_interval()
    }

    /// The largest number of members containing any single point. O(1).
    pub fn maximum_depth(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.max.max(0) as usize)
    }

    /// The hull of the collection: from the lowest low endpoint to the
    /// highest high endpoint, with an endpoint included iff some member
    /// attaining it includes it.
    pub fn span(&self) -> Result<Interval<I::Endpoint>, EmptyCollection> {
        let root = self.root.as_deref().ok_or(EmptyCollection)?;

        let mut low_node = root;
        while let Some(left) = low_node.left.as_deref() {
            low_node = left;
        }
        let mut high_node = root;
        while let Some(right) = high_node.right.as_deref() {
            high_node = right;
        }

        let span = Interval::new(
            low_node.key.clone(),
            !low_node.equal.is_empty(),
            high_node.key.clone(),
            !high_node.equal.is_empty(),
        )
        .expect("endpoint keys are ordered");
        Ok(span)
    }

    /// A member whose low endpoint attains the span's low bound.
    pub fn lowest_interval(&self) -> Result<IntervalRef<I>, EmptyCollection> {
        let mut node = self.root.as_deref().ok_or(EmptyCollection)?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }

        // Members starting at the minimum key sit in its `equal` or
        // `greater` set, or in a `less` set down the left spine of its
        // right subtree when both endpoints fall inside that subtree.
        if let Some(interval) = node.equal.choose() {
            return Ok(interval.clone());
        }
        if let Some(interval) = node.greater.choose() {
            return Ok(interval.clone());
        }
        let mut spine = node.right.as_deref();
        while let Some(n) = spine {
            if let Some(interval) = n.less.choose() {
                return Ok(interval.clone());
            }
            spine = n.left.as_deref();
        }
        unreachable!("an occupied tree exposes an interval at its minimum key")
    }

    /// A member whose high endpoint attains the span's high bound.
    pub fn highest_interval(&self) -> Result<IntervalRef<I>, EmptyCollection> {
        let mut node = self.root.as_deref().ok_or(EmptyCollection)?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }

        if let Some(interval) = node.equal.choose() {
            return Ok(interval.clone());
        }
        if let Some(interval) = node.less.choose() {
            return Ok(interval.clone());
        }
        let mut spine = node.left.as_deref();
        while let Some(n) = spine {
            if let Some(interval) = n.greater.choose() {
                return Ok(interval.clone());
            }
            spine = n.right.as_deref();
        }
        unreachable!("an occupied tree exposes an interval at its maximum key")
    }

    /// All members containing the point, as a lazy single-path
    /// iterator. Order is unspecified; the output carries no
    /// duplicates. O(log n + k).
    pub fn find_overlaps_at(&self, point: &I::Endpoint) -> PointOverlaps<'_, I> {
        PointOverlaps::new(self.root.as_deref(), point.clone())
    }

    /// All members overlapping the query interval, deduplicated by
    /// reference.
    pub fn find_overlaps<Q>(&self, query: &Q) -> Overlaps<I>
    where
        Q: IntervalBounds<Endpoint = I::Endpoint>,
    {
        let mut result = IntervalSet::new();
        collect_overlaps(self.root.as_deref(), query, &mut result);
        Overlaps::from(result)
    }

    /// Any one member containing the point, if one exists.
    pub fn find_any_overlap_at(&self, point: &I::Endpoint) -> Option<IntervalRef<I>> {
        self.find_overlaps_at(point).next()
    }

    /// Any one member overlapping the query interval, if one exists.
    pub fn find_any_overlap<Q>(&self, query: &Q) -> Option<IntervalRef<I>>
    where
        Q: IntervalBounds<Endpoint = I::Endpoint>,
    {
        self.find_overlaps(query).next()
    }

    /// The number of members containing the point.
    pub fn count_overlaps_at(&self, point: &I::Endpoint) -> usize {
        self.find_overlaps_at(point).count()
    }

    /// The number of members overlapping the query interval.
    pub fn count_overlaps<Q>(&self, query: &Q) -> usize
    where
        Q: IntervalBounds<Endpoint = I::Endpoint>,
    {
        self.find_overlaps(query).count()
    }

    /// Iterates every member exactly once. Order is unspecified.
    pub fn iter(&self) -> Overlaps<I> {
        let mut all = IntervalSet::new();
        collect_subtree(self.root.as_deref(), &mut all);
        Overlaps::from(all)
    }

    fn node_at(&self, key: &I::Endpoint) -> Option<&Node<I>> {
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            node = match key.cmp(&n.key) {
                Ordering::Equal => return Some(n),
                Ordering::Less => n.left.as_deref(),
                Ordering::Greater => n.right.as_deref(),
            };
        }
        None
    }

    fn endpoint_sets_contain(&self, key: &I::Endpoint, interval: &IntervalRef<I>) -> bool {
        match self.node_at(key) {
            None => false,
            Some(node) => {
                node.less.contains(interval)
                    || node.equal.contains(interval)
                    || node.greater.contains(interval)
            }
        }
    }

    /// Drops the endpoint node for `key` if no remaining member
    /// references the key. A member referencing the key is either
    /// visible in the node's three sets or accounted in the delta
    /// bookkeeping, so both must be clear.
    fn collect_endpoint(&mut self, key: &I::Endpoint) {
        let unreferenced = match self.node_at(key) {
            None => false,
            Some(node) => {
                node.delta == 0
                    && node.delta_after == 0
                    && !references_endpoint(&node.less, key)
                    && !references_endpoint(&node.equal, key)
                    && !references_endpoint(&node.greater, key)
            }
        };
        if !unreferenced {
            return;
        }

        self.root = delete_key(self.root.take(), key, None);
        if let Some(root) = &mut self.root {
            root.color = Color::Black;
        }
    }
}

impl<I> FromIterator<I> for IbsTree<I>
where
    I: IntervalBounds,
{
    /// Collects intervals into a fresh tree, allocating a handle for
    /// each.
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = I>,
    {
        let mut tree = Self::new();
        for interval in iter {
            tree.add(Rc::new(interval));
        }
        tree
    }
}

fn references_endpoint<I>(set: &IntervalSet<I>, key: &I::Endpoint) -> bool
where
    I: IntervalBounds,
{
    set.iter()
        .any(|interval| interval.low() == *key || interval.high() == *key)
}

/// The most recent left-turn ancestor bounds the flank between this
/// node's key and the rest of the tree; the interval covers that whole
/// flank iff it reaches the ancestor's key.
fn reaches_right_up<I>(right_up: Option<&I::Endpoint>, interval: &IntervalRef<I>) -> bool
where
    I: IntervalBounds,
{
    right_up.map_or(false, |key| *key <= interval.high())
}

/// Mirror of [`reaches_right_up`] for the most recent right-turn
/// ancestor.
fn reaches_left_up<I>(left_up: Option<&I::Endpoint>, interval: &IntervalRef<I>) -> bool
where
    I: IntervalBounds,
{
    left_up.map_or(false, |key| interval.low() <= *key)
}

/// Descent for the interval's low endpoint: creates the endpoint node
/// if absent, installs `equal` at every passed node whose key the
/// interval contains, installs `greater` where the flank up to the
/// most recent left-turn ancestor lies inside the interval, and books
/// the low endpoint's delta contribution at the endpoint node.
fn add_low<I>(
    node: ChildNode<I>,
    right_up: Option<&I::Endpoint>,
    interval: &IntervalRef<I>,
) -> Box<Node<I>>
where
    I: IntervalBounds,
{
    let low = interval.low();
    let mut node = match node {
        Some(node) => node,
        None => Box::new(Node::new(low.clone())),
    };

    match low.cmp(&node.key) {
        Ordering::Less => {
            if interval.contains_point(&node.key) {
                node.equal.add(interval.clone());
            }
            if reaches_right_up(right_up, interval) {
                node.greater.add(interval.clone());
            }
            let left = node.left.take();
            node.left = Some(add_low(left, Some(&node.key), interval));
        }
        Ordering::Greater => {
            let right = node.right.take();
            node.right = Some(add_low(right, right_up, interval));
        }
        Ordering::Equal => {
            if interval.low_included() {
                node.delta += 1;
                node.equal.add(interval.clone());
            } else {
                node.delta_after += 1;
            }
            if reaches_right_up(right_up, interval) {
                node.greater.add(interval.clone());
            }
        }
    }

    fix_up(node)
}

/// Mirror descent for the interval's high endpoint.
fn add_high<I>(
    node: ChildNode<I>,
    left_up: Option<&I::Endpoint>,
    interval: &IntervalRef<I>,
) -> Box<Node<I>>
where
    I: IntervalBounds,
{
    let high = interval.high();
    let mut node = match node {
        Some(node) => node,
        None => Box::new(Node::new(high.clone())),
    };

    match high.cmp(&node.key) {
        Ordering::Greater => {
            if interval.contains_point(&node.key) {
                node.equal.add(interval.clone());
            }
            if reaches_left_up(left_up, interval) {
                node.less.add(interval.clone());
            }
            let right = node.right.take();
            node.right = Some(add_high(right, Some(&node.key), interval));
        }
        Ordering::Less => {
            let left = node.left.take();
            node.left = Some(add_high(left, left_up, interval));
        }
        Ordering::Equal => {
            if interval.high_included() {
                node.delta_after -= 1;
                node.equal.add(interval.clone());
            } else {
                node.delta -= 1;
            }
            if reaches_left_up(left_up, interval) {
                node.less.add(interval.clone());
            }
        }
    }

    fix_up(node)
}

/// Subtracts the interval from the placements the low descent made.
/// Structure and colors stay untouched; only the depth aggregates are
/// refreshed on the way back up.
fn remove_low<I>(
    node: &mut ChildNode<I>,
    right_up: Option<&I::Endpoint>,
    interval: &IntervalRef<I>,
) where
    I: IntervalBounds,
{
    let node = match node {
        Some(node) => node,
        None => return,
    };

    match interval.low().cmp(&node.key) {
        Ordering::Less => {
            if interval.contains_point(&node.key) {
                node.equal.remove(interval);
            }
            if reaches_right_up(right_up, interval) {
                node.greater.remove(interval);
            }
            let (left, key) = (&mut node.left, &node.key);
            remove_low(left, Some(key), interval);
        }
        Ordering::Greater => {
            remove_low(&mut node.right, right_up, interval);
        }
        Ordering::Equal => {
            if interval.low_included() {
                node.delta -= 1;
                node.equal.remove(interval);
            } else {
                node.delta_after -= 1;
            }
            if reaches_right_up(right_up, interval) {
                node.greater.remove(interval);
            }
        }
    }

    node.update_max();
}

/// Mirror of [`remove_low`] for the high descent.
fn remove_high<I>(
    node: &mut ChildNode<I>,
    left_up: Option<&I::Endpoint>,
    interval: &IntervalRef<I>,
) where
    I: IntervalBounds,
{
    let node = match node {
        Some(node) => node,
        None => return,
    };

    match interval.high().cmp(&node.key) {
        Ordering::Greater => {
            if interval.contains_point(&node.key) {
                node.equal.remove(interval);
            }
            if reaches_left_up(left_up, interval) {
                node.less.remove(interval);
            }
            let (right, key) = (&mut node.right, &node.key);
            remove_high(right, Some(key), interval);
        }
        Ordering::Less => {
            remove_high(&mut node.left, left_up, interval);
        }
        Ordering::Equal => {
            if interval.high_included() {
                node.delta_after += 1;
                node.equal.remove(interval);
            } else {
                node.delta += 1;
            }
            if reaches_left_up(left_up, interval) {
                node.less.remove(interval);
            }
        }
    }

    node.update_max();
}

/// Left-leaning red-black delete of an unreferenced endpoint key.
///
/// `hi` is the key of the most recent left-turn ancestor: the upper
/// bound of the current slot's key range, needed to re-hang the
/// spliced successor's `greater` members at the right height.
fn delete_key<I>(
    node: ChildNode<I>,
    key: &I::Endpoint,
    hi: Option<&I::Endpoint>,
) -> ChildNode<I>
where
    I: IntervalBounds,
{
    let mut h = node?;

    if *key < h.key {
        if h.left.is_some()
            && !is_red(&h.left)
            && !h.left.as_ref().map_or(false, |l| is_red(&l.left))
        {
            h = move_red_left(h);
        }
        let left = h.left.take();
        h.left = delete_key(left, key, Some(&h.key));
    } else {
        if is_red(&h.left) {
            h = rotate_right(h);
        }
        if *key == h.key && h.right.is_none() {
            // An unreferenced endpoint at the bottom carries nothing:
            // any set member would have to cover the whole keyless
            // gap around it and would therefore live higher up.
            debug_assert!(h.left.is_none());
            debug_assert!(h.less.is_empty() && h.equal.is_empty() && h.greater.is_empty());
            debug_assert!(h.delta == 0 && h.delta_after == 0);
            return None;
        }
        if h.right.is_some()
            && !is_red(&h.right)
            && !h.right.as_ref().map_or(false, |r| is_red(&r.left))
        {
            h = move_red_right(h);
        }
        if *key == h.key {
            splice_successor(&mut h, hi);
        } else {
            let right = h.right.take();
            h.right = delete_key(right, key, hi);
        }
    }

    Some(fix_up(h))
}

/// Replaces the doomed node's key with its in-order successor's and
/// merges the successor's payload: deltas are summed, `equal` members
/// are united (dropping the ones that no longer contain the new key),
/// the successor's `less` dissolves into placements that already exist
/// deeper down, and its `greater` members re-hang along the left spine
/// of the right subtree at the height matching their reach.
fn splice_successor<I>(h: &mut Box<Node<I>>, hi: Option<&I::Endpoint>)
where
    I: IntervalBounds,
{
    let right = h
        .right
        .take()
        .expect("a doomed node with a successor keeps its right subtree");
    let (right, successor) = delete_min(right);
    h.right = right;
    let successor = *successor;

    h.key = successor.key;
    h.delta += successor.delta;
    h.delta_after += successor.delta_after;

    let new_key = h.key.clone();
    h.equal.retain(|interval| interval.contains_point(&new_key));
    h.equal.merge(&successor.equal);

    // Successor `greater` members all start at the new key; each hangs
    // at the highest position whose flank it covers completely.
    let mut pending: SmallVec<[IntervalRef<I>; 8]> = successor.greater.into_iter().collect();
    if let Some(top) = hi {
        let mut rest = SmallVec::new();
        for interval in pending {
            if interval.high() >= *top {
                h.greater.add(interval);
            } else {
                rest.push(interval);
            }
        }
        pending = rest;
    }
    let mut spine = h.right.as_mut();
    while let Some(n) = spine {
        if pending.is_empty() {
            break;
        }
        let mut rest = SmallVec::new();
        for interval in pending {
            if interval.high() >= n.key {
                n.less.add(interval);
            } else {
                rest.push(interval);
            }
        }
        pending = rest;
        spine = n.left.as_mut();
    }
    debug_assert!(pending.is_empty(), "every successor interval re-hangs");
}

/// Splices out the leftmost node of the subtree and returns it whole,
/// payload included, alongside the rebalanced remainder.
fn delete_min<I>(mut h: Box<Node<I>>) -> (ChildNode<I>, Box<Node<I>>)
where
    I: IntervalBounds,
{
    if h.left.is_none() {
        debug_assert!(h.right.is_none());
        return (None, h);
    }

    if !is_red(&h.left) && !h.left.as_ref().map_or(false, |l| is_red(&l.left)) {
        h = move_red_left(h);
    }
    let left = h.left.take().expect("move_red_left keeps the left chain");
    let (left, min) = delete_min(left);
    h.left = left;
    (Some(fix_up(h)), min)
}
