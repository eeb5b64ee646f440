// Each test file invoking this macro provides, in scope:
// - `type List`, a skiplist whose entries represent `u32` values,
// - `fn new_list(seed: u64) -> List`,
// - `fn insert(list: &mut List, value: u32)`,
// - `fn entry(value: u32) -> Box<Entry>`, the entry representing `value`,
// - `fn value(entry: &Entry) -> u32`, the inverse of `entry`,
// - `fn cmp_values(lhs: u32, rhs: u32) -> Ordering`, the order the list's comparator induces.
macro_rules! tests_for_all_skiplists {
    () => {
        /// The model of a skiplist holding `inserted`: the same values, stably sorted.
        fn model(inserted: &[u32]) -> Vec<u32> {
            let mut sorted = inserted.to_vec();
            sorted.sort_by(|lhs, rhs| cmp_values(*lhs, *rhs));
            sorted
        }

        fn collect(list: &List) -> Vec<u32> {
            list.iter().map(value).collect()
        }

        // ================================
        //  Empty List
        // ================================

        #[test]
        fn empty_list() {
            let list = new_list(1);

            assert!(list.is_empty());
            assert_eq!(list.len(), 0);
            assert!(!list.contains(&entry(0)));
            assert!(!list.contains(&entry(u32::MAX)));
            assert!(list.front().is_none());
            assert!(list.back().is_none());
            assert!(list.begin() == list.end());

            let _check_that_debug_works = format!("{list:?}");
        }

        #[test]
        fn empty_list_iter() {
            let list = new_list(1);
            let mut iter = list.iter();

            assert!(!iter.valid());
            assert!(iter.current().is_none());
            assert!(iter.next().is_none());
            assert!(iter.prev().is_none());
            assert!(!iter.valid());
            assert!(iter == list.end());

            iter.seek_to_first();
            assert!(iter.current().is_none());
            iter.seek_to_last();
            assert!(iter.current().is_none());
            iter.seek(&*entry(5));
            assert!(iter.current().is_none());
            iter.seek_before(&*entry(5));
            assert!(iter.current().is_none());

            let _check_that_debug_works = format!("{iter:?}");
        }

        // ================================
        //  Small Lists
        // ================================

        #[test]
        fn contains_only_inserted() {
            let mut list = new_list(2);
            for value in [10, 3, 7] {
                insert(&mut list, value);
            }

            for value in [3, 7, 10] {
                assert!(list.contains(&entry(value)));
            }
            for value in [2, 8, 11] {
                assert!(!list.contains(&entry(value)));
            }
            assert_eq!(list.len(), 3);
        }

        #[test]
        fn iteration_is_sorted() {
            let inserted = [8, 1, 5, 3, 9, 2];
            let mut list = new_list(3);
            for value in inserted {
                insert(&mut list, value);
            }

            let expected = model(&inserted);
            assert_eq!(collect(&list), expected);
            assert_eq!(list.front().map(value), expected.first().copied());
            assert_eq!(list.back().map(value), expected.last().copied());

            // `&List` is iterable, too.
            let mut count = 0;
            for _entry in &list {
                count += 1;
            }
            assert_eq!(count, inserted.len());
        }

        #[test]
        fn seek_finds_first_not_less() {
            let mut list = new_list(4);
            for value in [2, 4, 6, 8] {
                insert(&mut list, value);
            }

            let sorted = model(&[2, 4, 6, 8]);
            for target in 0..10 {
                let iter = list.seek(&entry(target));
                let expected = sorted
                    .iter()
                    .copied()
                    .find(|&value| cmp_values(value, target).is_ge());

                assert_eq!(iter.current().map(value), expected);
                assert_eq!(iter.valid(), expected.is_some());
                assert_eq!(iter == list.end(), expected.is_none());
            }

            let exact = list.seek(&entry(4));
            assert_eq!(exact.current().map(value), Some(4));
        }

        #[test]
        fn seek_before_finds_last_less() {
            let mut list = new_list(5);
            for value in [2, 4, 6, 8] {
                insert(&mut list, value);
            }

            let sorted = model(&[2, 4, 6, 8]);
            let mut iter = list.iter();
            for target in 0..10 {
                iter.seek_before(&*entry(target));
                let expected = sorted
                    .iter()
                    .copied()
                    .rev()
                    .find(|&value| cmp_values(value, target).is_lt());

                assert_eq!(iter.current().map(value), expected);
            }
        }

        #[test]
        fn prev_from_end_walks_backwards() {
            let inserted = [4, 1, 7];
            let mut list = new_list(6);
            for value in inserted {
                insert(&mut list, value);
            }

            let mut iter = list.end();
            for expected in model(&inserted).into_iter().rev() {
                assert_eq!(iter.prev().map(value), Some(expected));
                assert!(iter.valid());
            }

            assert!(iter.prev().is_none());
            assert!(!iter.valid());
            assert!(iter == list.end());

            // The end position is circular.
            assert_eq!(iter.next().map(value), list.front().map(value));
            iter.reset();
            assert_eq!(iter.prev().map(value), list.back().map(value));
        }

        #[test]
        fn iter_clones_are_independent() {
            let mut list = new_list(7);
            for value in [1, 2] {
                insert(&mut list, value);
            }

            let mut iter = list.begin();
            let clone = iter.clone();
            assert!(iter == clone);

            iter.seek_to_last();
            assert!(iter != clone);
            assert_eq!(clone.current().map(value), list.front().map(value));
            assert_eq!(iter.current().map(value), list.back().map(value));

            // Iterators over different lists are never equal.
            let other = new_list(7);
            assert!(list.end() != other.end());
        }

        #[test]
        fn duplicates_are_kept() {
            let inserted = [5, 3, 5, 5, 1, 3];
            let mut list = new_list(8);
            for value in inserted {
                insert(&mut list, value);
            }

            assert_eq!(list.len(), inserted.len());
            assert_eq!(collect(&list), model(&inserted));

            let mut iter = list.seek(&entry(5));
            let mut fives = 0;
            while iter.current().map(value) == Some(5) {
                fives += 1;
                iter.next();
            }
            assert_eq!(fives, 3);

            // Backwards over the duplicates, too.
            let mut backwards = Vec::new();
            let mut iter = list.end();
            while let Some(entry) = iter.prev() {
                backwards.push(value(entry));
            }
            backwards.reverse();
            assert_eq!(backwards, model(&inserted));
        }

        #[test]
        fn seeded_lists_are_reproducible() {
            let mut first = new_list(9);
            let mut second = new_list(9);
            for value in 0..200 {
                insert(&mut first, value);
                insert(&mut second, value);
            }

            assert_eq!(first.allocated_bytes(), second.allocated_bytes());
            assert_eq!(collect(&first), collect(&second));
        }

        // ================================
        //  Large List
        // ================================

        #[test]
        fn many_insertions_and_reads() {
            let mut prng = Rand32::new(0x_1234_5678);
            let mut list = new_list(10);
            let mut inserted = Vec::new();

            for _ in 0..2048 {
                let value = prng.rand_range(0..1024);
                insert(&mut list, value);
                inserted.push(value);
            }

            let sorted = model(&inserted);
            let distinct: BTreeSet<u32> = inserted.iter().copied().collect();

            assert_eq!(list.len(), sorted.len());
            assert_eq!(collect(&list), sorted);

            for target in 0..1030 {
                assert_eq!(list.contains(&entry(target)), distinct.contains(&target));

                let expected_start = sorted.partition_point(|&v| cmp_values(v, target).is_lt());
                let mut iter = list.seek(&entry(target));
                assert_eq!(iter.valid(), expected_start < sorted.len());

                // Step back once so that `next` yields the seeked entry first.
                iter.prev();
                let from_seek = iter.by_ref().take(4).map(value).collect::<Vec<_>>();
                let expected = sorted.iter().skip(expected_start).take(4).copied().collect::<Vec<_>>();
                assert_eq!(from_seek, expected);
            }

            // Iterate backwards through the whole list.
            let mut iter = list.end();
            for expected in sorted.iter().rev() {
                assert_eq!(iter.prev().map(value), Some(*expected));
            }
            assert!(iter.prev().is_none());
        }
    };
}

pub(crate) use tests_for_all_skiplists as tests_for_all_skiplists;
