use crate::ibs_tree::interval_set::{self, IntervalRef, IntervalSet};
use crate::ibs_tree::node::Node;
use crate::interval::IntervalBounds;
use std::cmp::Ordering;

/// Lazy single-path iterator over the intervals containing one point.
///
/// Descends the endpoint tree once: emits `less` and turns left while
/// the point lies below the key, emits `greater` and turns right while
/// it lies above, and finishes on `equal` when the point hits a key.
/// The placement invariant guarantees every emitted interval contains
/// the point and no interval is emitted twice.
pub struct PointOverlaps<'a, I>
where
    I: IntervalBounds,
{
    point: I::Endpoint,
    node: Option<&'a Node<I>>,
    draining: Option<interval_set::Iter<'a, I>>,
}

impl<'a, I> PointOverlaps<'a, I>
where
    I: IntervalBounds,
{
    pub(crate) fn new(root: Option<&'a Node<I>>, point: I::Endpoint) -> Self {
        Self {
            point,
            node: root,
            draining: None,
        }
    }
}

impl<'a, I> Iterator for PointOverlaps<'a, I>
where
    I: IntervalBounds,
{
    type Item = IntervalRef<I>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(draining) = &mut self.draining {
                if let Some(interval) = draining.next() {
                    return Some(interval.clone());
                }
                self.draining = None;
            }

            let node = self.node?;
            match self.point.cmp(&node.key) {
                Ordering::Less => {
                    self.draining = Some(node.less.iter());
                    self.node = node.left.as_deref();
                }
                Ordering::Greater => {
                    self.draining = Some(node.greater.iter());
                    self.node = node.right.as_deref();
                }
                Ordering::Equal => {
                    self.draining = Some(node.equal.iter());
                    self.node = None;
                }
            }
        }
    }
}

/// Owning iterator over the intervals overlapping a query interval,
/// deduplicated by reference before being surfaced.
pub struct Overlaps<I> {
    inner: interval_set::IntoIter<I>,
}

impl<I> Iterator for Overlaps<I> {
    type Item = IntervalRef<I>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<I> From<IntervalSet<I>> for Overlaps<I> {
    fn from(set: IntervalSet<I>) -> Self {
        Self {
            inner: set.into_iter(),
        }
    }
}

/// The query lies entirely below the key: every point of it compares
/// below `key`, counting an excluded high endpoint that touches `key`.
fn entirely_before<Q>(query: &Q, key: &Q::Endpoint) -> bool
where
    Q: IntervalBounds,
{
    let high = query.high();
    high < *key || (high == *key && !query.high_included())
}

/// Mirror of [`entirely_before`] for the low end of the query.
fn entirely_after<Q>(query: &Q, key: &Q::Endpoint) -> bool
where
    Q: IntervalBounds,
{
    let low = query.low();
    *key < low || (low == *key && !query.low_included())
}

/// Collects every interval stored anywhere under `node`. Used for
/// wholesale emission of subtrees that lie entirely inside the query.
pub(crate) fn collect_subtree<I>(node: Option<&Node<I>>, out: &mut IntervalSet<I>)
where
    I: IntervalBounds,
{
    let node = match node {
        Some(node) => node,
        None => return,
    };
    out.merge(&node.less);
    out.merge(&node.equal);
    out.merge(&node.greater);
    collect_subtree(node.left.as_deref(), out);
    collect_subtree(node.right.as_deref(), out);
}

/// The two-phase overlap collection of the query engine: a descent to
/// the split node, then the asymmetric low and high phases into its
/// subtrees.
pub(crate) fn collect_overlaps<I, Q>(root: Option<&Node<I>>, query: &Q, out: &mut IntervalSet<I>)
where
    I: IntervalBounds,
    Q: IntervalBounds<Endpoint = I::Endpoint>,
{
    let mut node = root;
    while let Some(n) = node {
        if entirely_before(query, &n.key) {
            out.merge(&n.less);
            node = n.left.as_deref();
        } else if entirely_after(query, &n.key) {
            out.merge(&n.greater);
            node = n.right.as_deref();
        } else {
            // Split node: both query endpoints descend into this
            // subtree, so its sets must be filtered individually.
            for interval in n.less.iter().chain(n.equal.iter()).chain(n.greater.iter()) {
                if interval.overlaps(query) {
                    out.add(interval.clone());
                }
            }
            low_phase(n.left.as_deref(), query, out);
            high_phase(n.right.as_deref(), query, out);
            return;
        }
    }
}

/// Descends the split node's left subtree, tracking the query's low
/// endpoint. Keys below the low endpoint prune to the right flank;
/// keys above it put the whole node and its right subtree inside the
/// query.
fn low_phase<I, Q>(mut node: Option<&Node<I>>, query: &Q, out: &mut IntervalSet<I>)
where
    I: IntervalBounds,
    Q: IntervalBounds<Endpoint = I::Endpoint>,
{
    let low = query.low();
    while let Some(n) = node {
        match low.cmp(&n.key) {
            Ordering::Greater => {
                out.merge(&n.greater);
                node = n.right.as_deref();
            }
            Ordering::Less => {
                out.merge(&n.less);
                out.merge(&n.equal);
                out.merge(&n.greater);
                collect_subtree(n.right.as_deref(), out);
                node = n.left.as_deref();
            }
            Ordering::Equal => {
                out.merge(&n.greater);
                if query.low_included() {
                    out.merge(&n.equal);
                }
                collect_subtree(n.right.as_deref(), out);
                return;
            }
        }
    }
}

/// Mirror of [`low_phase`] for the split node's right subtree and the
/// query's high endpoint.
fn high_phase<I, Q>(mut node: Option<&Node<I>>, query: &Q, out: &mut IntervalSet<I>)
where
    I: IntervalBounds,
    Q: IntervalBounds<Endpoint = I::Endpoint>,
{
    let high = query.high();
    while let Some(n) = node {
        match high.cmp(&n.key) {
            Ordering::Less => {
                out.merge(&n.less);
                node = n.left.as_deref();
            }
            Ordering::Greater => {
                out.merge(&n.less);
                out.merge(&n.equal);
                out.merge(&n.greater);
                collect_subtree(n.left.as_deref(), out);
                node = n.right.as_deref();
            }
            Ordering::Equal => {
                out.merge(&n.less);
                if query.high_included() {
                    out.merge(&n.equal);
                }
                collect_subtree(n.left.as_deref(), out);
                return;
            }
        }
    }
}
