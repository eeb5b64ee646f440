#![allow(unused_crate_dependencies, reason = "These are tests, not the main crate.")]

mod all;


use std::{cell::RefCell, cmp::Ordering, collections::BTreeSet};

use oorandom::Rand32;

use strata_skiplist::{
    ByteSkiplist, BytewiseComparator, Comparator, CursorIterator as _, NodeArena as _,
    Seekable as _,
};


type List = ByteSkiplist;

fn new_list(seed: u64) -> List {
    List::new_seeded(BytewiseComparator, seed)
}

fn insert(list: &mut List, value: u32) {
    list.insert_copy(&value.to_be_bytes());
}

fn entry(value: u32) -> Box<[u8]> {
    Box::new(value.to_be_bytes())
}

fn value(entry: &[u8]) -> u32 {
    let bytes: [u8; 4] = entry.try_into().unwrap();
    u32::from_be_bytes(bytes)
}

fn cmp_values(lhs: u32, rhs: u32) -> Ordering {
    Ord::cmp(&lhs, &rhs)
}

all::tests_for_all_skiplists!();


#[test]
fn variable_length_entries() {
    let mut list = ByteSkiplist::new(BytewiseComparator);

    let one: &[u8] = &[1];
    let two: &[u8] = &[2, 2];

    list.insert_with(1, |data| data[0] = 1);
    list.insert_copy(two);
    list.insert_copy(&[]);

    let mut iter = list.iter();
    iter.seek(b"".as_slice());
    assert_eq!(iter.current(), Some(b"".as_slice()));
    assert_eq!(iter.next(), Some(one));
    assert_eq!(iter.next(), Some(two));
    assert_eq!(iter.next(), None);

    // `&[1]` is smaller than `&[1, 2]`, so this seeks to `&[2, 2]`
    iter.seek([1_u8, 2].as_slice());
    assert_eq!(iter.current(), Some(two));
    iter.seek([3_u8].as_slice());
    assert!(!iter.valid());
}

#[test]
fn large_entries_are_stored_intact() {
    let mut list = ByteSkiplist::new(BytewiseComparator);
    let large = vec![9_u8; 10_000];

    list.insert_copy(&large);
    list.insert_copy(b"small");

    assert_eq!(list.back(), Some(b"small".as_slice()));
    assert_eq!(list.front(), Some(large.as_slice()));
    assert!(list.allocated_bytes() >= 10_000);
    assert_eq!(list.arena().len(), 2);
}

// A broken comparator may produce a strangely ordered list, but must not cause a panic
// or an infinite loop when walking forwards.
#[test]
fn broken_comparators() {
    #[derive(Debug)]
    struct BadComparator(RefCell<Rand32>);

    impl Comparator<[u8]> for BadComparator {
        fn cmp(&self, _lhs: &[u8], _rhs: &[u8]) -> Ordering {
            match self.0.borrow_mut().rand_range(0..3) {
                0 => Ordering::Less,
                1 => Ordering::Equal,
                _ => Ordering::Greater,
            }
        }
    }

    let mut list = ByteSkiplist::new(BadComparator(RefCell::new(Rand32::new(666))));

    for i in 0..1024_u32 {
        list.insert_copy(i.to_le_bytes().as_slice());
    }

    let num_entries = list.iter().count();
    assert_eq!(num_entries, 1024);
}
