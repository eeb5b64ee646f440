#![allow(unused_crate_dependencies, reason = "These are tests, not the main crate.")]

use strata_memtable::{EntryType, WriteBatch, WriteEntry};


const HEADER_LEN: usize = 12;

#[test]
fn empty_batch() {
    let batch = WriteBatch::new();

    assert_eq!(batch.approximate_size(), HEADER_LEN);
    assert_eq!(batch.count(), 0);
    assert_eq!(batch.sequence(), 0);
    assert_eq!(batch.iter().count(), 0);
    assert_eq!(batch, WriteBatch::default());
}

#[test]
fn each_record_increments_count_and_size() {
    let mut batch = WriteBatch::new();

    batch.put(b"foo", b"bar");
    assert_eq!(batch.count(), 1);
    // Type byte, then two length-prefixed fields.
    assert_eq!(batch.approximate_size(), HEADER_LEN + 1 + (4 + 3) + (4 + 3));

    batch.delete(b"box");
    assert_eq!(batch.count(), 2);
    assert_eq!(batch.approximate_size(), HEADER_LEN + 15 + 1 + (4 + 3));

    batch.put(b"baz", b"boo");
    assert_eq!(batch.count(), 3);
    assert_eq!(batch.approximate_size(), HEADER_LEN + 15 + 8 + 15);
}

#[test]
fn records_in_order() {
    let mut batch = WriteBatch::new();
    batch.put(b"foo", b"bar");
    batch.delete(b"box");
    batch.put(b"baz", b"boo");

    let entries = batch.iter().collect::<Result<Vec<_>, _>>().unwrap();
    assert_eq!(entries, [
        WriteEntry::Value { key: b"foo", value: b"bar" },
        WriteEntry::Deletion { key: b"box" },
        WriteEntry::Value { key: b"baz", value: b"boo" },
    ]);

    assert_eq!(entries[1].entry_type(), EntryType::Deletion);
    assert_eq!(entries[1].value(), None);
    assert_eq!(entries[2].key(), b"baz");

    let mut via_ref = 0;
    for entry in &batch {
        entry.unwrap();
        via_ref += 1;
    }
    assert_eq!(via_ref, 3);
}

#[test]
fn sequence_header() {
    let mut batch = WriteBatch::new();
    batch.set_sequence(100);
    batch.put(b"k", b"v");

    assert_eq!(batch.sequence(), 100);
    assert_eq!(&batch.contents()[..8], 100_u64.to_le_bytes());

    batch.set_sequence(u64::MAX);
    assert_eq!(batch.sequence(), u64::MAX);
    assert_eq!(batch.count(), 1);
}

#[test]
fn append_sums_counts_and_payloads() {
    let mut lhs = WriteBatch::new();
    lhs.set_sequence(200);
    let mut rhs = WriteBatch::new();
    rhs.set_sequence(300);

    lhs.append(&rhs);
    assert_eq!(lhs.approximate_size(), HEADER_LEN);
    assert_eq!(lhs.count(), 0);

    rhs.put(b"a", b"va");
    let lhs_size = lhs.approximate_size();
    lhs.append(&rhs);
    assert_eq!(lhs.approximate_size(), lhs_size + rhs.approximate_size() - HEADER_LEN);
    assert_eq!(lhs.count(), 1);
    assert_eq!(lhs.sequence(), 200);

    rhs.clear();
    rhs.put(b"b", b"vb");
    lhs.append(&rhs);
    assert_eq!(lhs.count(), 2);

    rhs.delete(b"foo");
    let lhs_size = lhs.approximate_size();
    lhs.append(&rhs);
    assert_eq!(lhs.approximate_size(), lhs_size + rhs.approximate_size() - HEADER_LEN);
    assert_eq!(lhs.count(), 4);

    let keys = lhs.iter().map(|entry| entry.unwrap().key()).collect::<Vec<_>>();
    assert_eq!(keys, [b"a".as_slice(), b"b", b"b", b"foo"]);
}

#[test]
fn clear_resets_everything() {
    let mut batch = WriteBatch::new();
    batch.set_sequence(7);
    batch.put(b"k", b"v");
    batch.clear();

    assert_eq!(batch, WriteBatch::new());
}

#[test]
fn contents_round_trip() {
    let mut batch = WriteBatch::new();
    batch.set_sequence(42);
    batch.put(b"key", b"value");
    batch.delete(b"gone");

    let copy = WriteBatch::from_contents(batch.contents().to_vec()).unwrap();
    assert_eq!(copy, batch);
    assert_eq!(copy.count(), 2);
}
