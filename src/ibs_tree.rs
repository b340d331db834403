//! The interval binary search tree: an endpoint tree with per-node
//! interval sets answering stabbing and overlap queries in
//! output-sensitive time, plus a constant-time maximum overlap depth.

mod error;
mod interval_set;
mod node;
mod query;
mod tree;

pub use error::EmptyCollection;
pub use interval_set::{IntervalRef, IntervalSet};
pub use query::{Overlaps, PointOverlaps};
pub use tree::IbsTree;

#[cfg(test)]
mod test {
    use super::tree::test_support::{check_invariants, structure_signature};
    use super::*;
    use crate::interval::{Interval, IntervalBounds};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeSet;
    use std::rc::Rc;

    fn handles(intervals: &[Interval<i32>]) -> Vec<IntervalRef<Interval<i32>>> {
        intervals.iter().map(|i| Rc::new(*i)).collect()
    }

    fn tree_of(handles: &[IntervalRef<Interval<i32>>]) -> IbsTree<Interval<i32>> {
        let mut tree = IbsTree::new();
        tree.add_all(handles.iter().cloned());
        tree
    }

    fn ids<T>(iter: T) -> BTreeSet<usize>
    where
        T: IntoIterator<Item = IntervalRef<Interval<i32>>>,
    {
        iter.into_iter()
            .map(|i| Rc::as_ptr(&i) as usize)
            .collect()
    }

    fn id(handle: &IntervalRef<Interval<i32>>) -> usize {
        Rc::as_ptr(handle) as usize
    }

    #[test]
    fn stabbing_three_closed_intervals_works() {
        let handles = handles(&[
            Interval::closed(1, 3),
            Interval::closed(2, 4),
            Interval::closed(5, 7),
        ]);
        let tree = tree_of(&handles);
        check_invariants(&tree);

        let stabbed = ids(tree.find_overlaps_at(&2));
        assert_eq!(stabbed, ids([handles[0].clone(), handles[1].clone()]));
        assert_eq!(tree.maximum_depth(), 2);
        assert_eq!(tree.span().unwrap(), Interval::closed(1, 7));
    }

    #[test]
    fn stabbing_honors_endpoint_exclusions() {
        let handles = handles(&[Interval::closed_open(1, 5), Interval::open_closed(3, 7)]);
        let tree = tree_of(&handles);
        check_invariants(&tree);

        assert_eq!(ids(tree.find_overlaps_at(&5)), ids([handles[1].clone()]));
        assert_eq!(ids(tree.find_overlaps_at(&3)), ids([handles[0].clone()]));

        let query = Interval::open(3, 5);
        assert_eq!(ids(tree.find_overlaps(&query)), ids(handles.clone()));
    }

    #[test]
    fn point_intervals_have_depth_one() {
        let handles = handles(&(0..10).map(Interval::point).collect::<Vec<_>>());
        let tree = tree_of(&handles);
        check_invariants(&tree);

        assert_eq!(tree.maximum_depth(), 1);
        let query = Interval::closed(2, 5);
        assert_eq!(
            ids(tree.find_overlaps(&query)),
            ids(handles[2..=5].iter().cloned())
        );
    }

    #[test]
    fn nested_intervals_stack_their_depth() {
        let handles = handles(&[
            Interval::closed(0, 10),
            Interval::closed(2, 4),
            Interval::closed(6, 8),
            Interval::point(3),
        ]);
        let tree = tree_of(&handles);
        check_invariants(&tree);

        assert_eq!(
            ids(tree.find_overlaps_at(&3)),
            ids([handles[0].clone(), handles[1].clone(), handles[3].clone()])
        );
        assert_eq!(tree.maximum_depth(), 3);
    }

    #[test]
    fn removal_restores_the_remaining_overlaps() {
        let handles = handles(&[
            Interval::closed(1, 2),
            Interval::closed(2, 3),
            Interval::closed(3, 4),
            Interval::closed(4, 5),
            Interval::closed(5, 6),
        ]);
        let mut tree = tree_of(&handles);

        assert!(tree.remove(&handles[2]));
        check_invariants(&tree);
        assert_eq!(tree.count(), 4);

        assert_eq!(ids(tree.find_overlaps_at(&3)), ids([handles[1].clone()]));
        let query = Interval::closed(2, 5);
        assert_eq!(
            ids(tree.find_overlaps(&query)),
            ids([
                handles[0].clone(),
                handles[1].clone(),
                handles[3].clone(),
                handles[4].clone(),
            ])
        );
    }

    #[test]
    fn queries_on_an_empty_collection_yield_nothing() {
        let tree = IbsTree::<Interval<i32>>::new();
        assert_eq!(tree.find_overlaps_at(&3).count(), 0);
        assert_eq!(tree.find_overlaps(&Interval::closed(1, 9)).count(), 0);
        assert_eq!(tree.maximum_depth(), 0);
        assert_eq!(tree.count(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.choose(), Err(EmptyCollection));
        assert_eq!(tree.span(), Err(EmptyCollection));
        assert_eq!(tree.lowest_interval(), Err(EmptyCollection));
        assert_eq!(tree.highest_interval(), Err(EmptyCollection));
    }

    #[test]
    fn duplicate_handles_are_rejected_but_twins_are_not() {
        let handle = Rc::new(Interval::closed(1, 5));
        let twin = Rc::new(Interval::closed(1, 5));

        let mut tree = IbsTree::new();
        assert!(!IbsTree::<Interval<i32>>::ALLOWS_REFERENCE_DUPLICATES);
        assert!(tree.add(handle.clone()));
        assert!(!tree.add(handle.clone()));
        assert!(tree.add(twin.clone()));
        assert_eq!(tree.count(), 2);
        assert_eq!(tree.maximum_depth(), 2);
        check_invariants(&tree);
    }

    #[test]
    fn removing_an_absent_interval_reports_false() {
        let handles = handles(&[Interval::closed(1, 5), Interval::closed(3, 9)]);
        let mut tree = tree_of(&[handles[0].clone()]);

        assert!(!tree.remove(&handles[1]));
        assert_eq!(tree.count(), 1);

        assert!(tree.remove(&handles[0]));
        assert!(!tree.remove(&handles[0]));
        assert!(tree.is_empty());
        check_invariants(&tree);
    }

    #[test]
    fn clear_is_idempotent() {
        let handles = handles(&[Interval::closed(1, 5), Interval::closed(3, 9)]);
        let mut tree = tree_of(&handles);

        tree.clear();
        assert!(tree.is_empty());
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.find_overlaps_at(&4).count(), 0);
    }

    #[test]
    fn span_inclusions_reflect_the_attaining_intervals() {
        let handles = handles(&[Interval::open_closed(0, 2), Interval::closed_open(0, 2)]);
        let mut tree = tree_of(&[handles[0].clone()]);
        assert_eq!(tree.span().unwrap(), Interval::open_closed(0, 2));

        // A second interval attaining the same bounds inclusively
        // flips the span's flags.
        tree.add(handles[1].clone());
        assert_eq!(tree.span().unwrap(), Interval::closed(0, 2));
        check_invariants(&tree);
    }

    #[test]
    fn open_intervals_keep_their_interior_depth() {
        // No integer lies strictly between 2 and 3, but the interval
        // still covers the dense interior, and the depth bookkeeping
        // reports it.
        let handles = handles(&[Interval::open(2, 3)]);
        let tree = tree_of(&handles);
        assert_eq!(tree.maximum_depth(), 1);
        assert_eq!(tree.find_overlaps_at(&2).count(), 0);
        assert_eq!(tree.find_overlaps_at(&3).count(), 0);
    }

    #[test]
    fn an_endpoint_shared_only_through_bookkeeping_survives_collection() {
        // (2, 9] leaves no set trace at its own low endpoint when 2 is
        // the tree minimum; only the delta bookkeeping references it.
        // Removing another interval ending at 2 must not collect the
        // node.
        let open_low = Rc::new(Interval::open_closed(2, 9));
        let closed = Rc::new(Interval::closed(0, 2));

        let mut tree = IbsTree::new();
        tree.add(open_low.clone());
        tree.add(closed.clone());
        check_invariants(&tree);

        assert!(tree.remove(&closed));
        check_invariants(&tree);
        assert_eq!(tree.maximum_depth(), 1);
        assert_eq!(ids(tree.find_overlaps_at(&5)), ids([open_low.clone()]));
        assert_eq!(tree.span().unwrap(), Interval::open_closed(2, 9));

        assert!(tree.remove(&open_low));
        assert!(tree.is_empty());
    }

    #[test]
    fn iteration_yields_every_member_once() {
        let handles = handles(&[
            Interval::closed(0, 10),
            Interval::closed(0, 10),
            Interval::closed(2, 4),
            Interval::point(7),
        ]);
        let tree = tree_of(&handles);

        assert_eq!(ids(tree.iter()), ids(handles.clone()));
        assert_eq!(tree.iter().count(), 4);
    }

    #[test]
    fn derived_queries_agree_with_find_overlaps() {
        let handles = handles(&[Interval::closed(1, 3), Interval::closed(2, 6)]);
        let tree = tree_of(&handles);

        assert_eq!(tree.count_overlaps_at(&2), 2);
        assert_eq!(tree.count_overlaps(&Interval::closed(4, 9)), 1);
        assert!(tree.find_any_overlap_at(&2).is_some());
        assert!(tree.find_any_overlap_at(&9).is_none());
        assert_eq!(
            tree.find_any_overlap(&Interval::closed(4, 9)).map(|i| id(&i)),
            Some(id(&handles[1]))
        );
    }

    #[test]
    fn lowest_and_highest_intervals_attain_the_span() {
        let handles = handles(&[
            Interval::open_closed(0, 4),
            Interval::closed(1, 2),
            Interval::closed_open(3, 9),
        ]);
        let tree = tree_of(&handles);

        let lowest = tree.lowest_interval().unwrap();
        assert_eq!(lowest.low(), 0);
        let highest = tree.highest_interval().unwrap();
        assert_eq!(highest.high(), 9);
        assert_eq!(tree.span().unwrap(), Interval::open(0, 9));
    }

    fn random_intervals(rng: &mut StdRng, count: usize) -> Vec<IntervalRef<Interval<i32>>> {
        (0..count)
            .map(|_| {
                let low = rng.gen_range(0..95);
                let high = rng.gen_range(low..100);
                Rc::new(Interval::closed(low, high))
            })
            .collect()
    }

    #[test]
    fn random_stabbing_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(0x1B5);
        let handles = random_intervals(&mut rng, 120);
        let tree = tree_of(&handles);
        check_invariants(&tree);

        for point in 0..=100 {
            let expected: BTreeSet<usize> = handles
                .iter()
                .filter(|i| i.contains_point(&point))
                .map(id)
                .collect();
            assert_eq!(ids(tree.find_overlaps_at(&point)), expected);
        }
    }

    #[test]
    fn random_overlap_queries_match_brute_force() {
        let mut rng = StdRng::seed_from_u64(0x1B6);
        let handles = random_intervals(&mut rng, 120);
        let tree = tree_of(&handles);

        for _ in 0..100 {
            let low = rng.gen_range(0..95);
            let high = rng.gen_range(low..100);
            let query = Interval::closed(low, high);

            let expected: BTreeSet<usize> = handles
                .iter()
                .filter(|i| i.overlaps(&query))
                .map(id)
                .collect();
            assert_eq!(ids(tree.find_overlaps(&query)), expected);
        }
    }

    #[test]
    fn random_maximum_depth_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(0x1B7);
        let handles = random_intervals(&mut rng, 80);
        let mut tree = IbsTree::new();

        for (step, handle) in handles.iter().enumerate() {
            tree.add(handle.clone());
            let live = &handles[..=step];
            let depth = (0..=100)
                .map(|point| live.iter().filter(|i| i.contains_point(&point)).count())
                .max()
                .unwrap();
            assert_eq!(tree.maximum_depth(), depth);
        }
        check_invariants(&tree);
    }

    #[test]
    fn random_removals_keep_the_invariants() {
        let mut rng = StdRng::seed_from_u64(0x1B8);
        let mut handles = random_intervals(&mut rng, 60);
        let mut tree = tree_of(&handles);

        while let Some(handle) = handles.pop() {
            assert!(tree.remove(&handle));
            check_invariants(&tree);

            for point in (0..=100).step_by(7) {
                let expected: BTreeSet<usize> = handles
                    .iter()
                    .filter(|i| i.contains_point(&point))
                    .map(id)
                    .collect();
                assert_eq!(ids(tree.find_overlaps_at(&point)), expected);
            }
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn insertion_order_does_not_change_query_results() {
        let mut rng = StdRng::seed_from_u64(0x1B9);
        let handles = random_intervals(&mut rng, 1000);

        let forward = tree_of(&handles);
        let mut reversed = handles.clone();
        reversed.reverse();
        let backward = tree_of(&reversed);

        for _ in 0..50 {
            let low = rng.gen_range(0..95);
            let high = rng.gen_range(low..100);
            let query = Interval::closed(low, high);
            assert_eq!(
                ids(forward.find_overlaps(&query)),
                ids(backward.find_overlaps(&query))
            );
        }
        for point in (0..=100).step_by(3) {
            assert_eq!(
                ids(forward.find_overlaps_at(&point)),
                ids(backward.find_overlaps_at(&point))
            );
        }
    }

    #[test]
    fn insert_then_remove_restores_the_exact_structure() {
        let mut rng = StdRng::seed_from_u64(0x1BA);

        for _ in 0..20 {
            let handles = random_intervals(&mut rng, 30);
            let mut tree = tree_of(&handles);
            let before = structure_signature(&tree);

            // An interval over existing endpoints leaves the node
            // structure alone, so the whole tree state must round-trip
            // exactly: keys, colors, deltas, and set contents.
            let mut endpoints: Vec<i32> = handles
                .iter()
                .flat_map(|i| [i.low(), i.high()])
                .collect();
            endpoints.sort_unstable();
            endpoints.dedup();
            let low_at = rng.gen_range(0..endpoints.len() - 1);
            let high_at = rng.gen_range(low_at + 1..endpoints.len());
            let extra = Rc::new(Interval::closed(endpoints[low_at], endpoints[high_at]));

            assert!(tree.add(extra.clone()));
            check_invariants(&tree);
            assert!(tree.remove(&extra));
            check_invariants(&tree);

            assert_eq!(structure_signature(&tree), before);
        }
    }

    #[test]
    fn insert_then_remove_of_fresh_endpoints_restores_the_semantics() {
        let mut rng = StdRng::seed_from_u64(0x1BB);
        let handles = random_intervals(&mut rng, 40);
        let mut tree = tree_of(&handles);

        let extra = Rc::new(Interval::closed(-10, 200));
        assert!(tree.add(extra.clone()));
        check_invariants(&tree);
        assert!(tree.remove(&extra));
        check_invariants(&tree);

        assert_eq!(tree.count(), handles.len());
        for point in (0..=100).step_by(5) {
            let expected: BTreeSet<usize> = handles
                .iter()
                .filter(|i| i.contains_point(&point))
                .map(id)
                .collect();
            assert_eq!(ids(tree.find_overlaps_at(&point)), expected);
        }
    }
}
