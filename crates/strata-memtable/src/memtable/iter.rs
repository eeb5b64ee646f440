use seekable_iterator::{Comparator, CursorIterator, Seekable};

use strata_skiplist::{ByteSkiplist, Iter};

use crate::{comparator::MemtableComparator, format::InternalEntry};
use crate::format::decode_memtable_entry;


/// Decode an entry which was encoded by [`Memtable::add`].
///
/// # Panics
/// Panics if the entry is malformed, which would indicate a bug in the memtable.
///
/// [`Memtable::add`]: super::Memtable::add
#[expect(clippy::expect_used, reason = "the memtable only holds entries it encoded")]
pub(super) fn decode_own_entry(entry: &[u8]) -> InternalEntry<'_> {
    decode_memtable_entry(entry).expect("memtable entries are well-formed")
}

/// A cursor over every write in a [`Memtable`], in internal-key order: user keys ascending,
/// then newest first.
///
/// Like the skiplist cursor it wraps, it has an end position between the last entry and the
/// first; see [`Iter`].
///
/// Seeking takes an encoded memtable key, such as [`LookupKey::memtable_key`]: seeking to the
/// memtable key of `LookupKey::new(user_key, s)` moves to the newest write to `user_key` which
/// is visible at sequence number `s`, or else to the first entry with a greater user key.
///
/// [`LookupKey::memtable_key`]: crate::LookupKey::memtable_key
///
/// [`Memtable`]: super::Memtable
#[derive(Debug)]
pub struct MemtableIter<'a, Cmp> {
    iter: Iter<'a, ByteSkiplist<MemtableComparator<Cmp>>>,
}

impl<'a, Cmp: Comparator<[u8]>> MemtableIter<'a, Cmp> {
    #[inline]
    #[must_use]
    pub(super) const fn new(list: &'a ByteSkiplist<MemtableComparator<Cmp>>) -> Self {
        Self { iter: Iter::new(list) }
    }
}

impl<Cmp> Clone for MemtableIter<'_, Cmp> {
    #[inline]
    fn clone(&self) -> Self {
        Self { iter: self.iter.clone() }
    }
}

impl<'a, Cmp: Comparator<[u8]>> Iterator for MemtableIter<'a, Cmp> {
    type Item = InternalEntry<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(decode_own_entry)
    }
}

impl<'a, Cmp: Comparator<[u8]>> CursorIterator for MemtableIter<'a, Cmp> {
    #[inline]
    fn valid(&self) -> bool {
        self.iter.valid()
    }

    #[inline]
    fn current(&self) -> Option<Self::Item> {
        self.iter.current().map(decode_own_entry)
    }

    /// Move backwards by one position and return the new current entry.
    #[inline]
    fn prev(&mut self) -> Option<Self::Item> {
        self.iter.prev().map(decode_own_entry)
    }
}

/// # Panics
/// The seek methods panic if the target does not begin with a length-prefixed internal key.
impl<Cmp: Comparator<[u8]>> Seekable<[u8], MemtableComparator<Cmp>> for MemtableIter<'_, Cmp> {
    /// Move to the end position.
    #[inline]
    fn reset(&mut self) {
        self.iter.reset();
    }

    #[inline]
    fn seek(&mut self, min_bound: &[u8]) {
        self.iter.seek(min_bound);
    }

    /// Move to the last entry sorting strictly before the encoded `strict_upper_bound`.
    #[inline]
    fn seek_before(&mut self, strict_upper_bound: &[u8]) {
        self.iter.seek_before(strict_upper_bound);
    }

    #[inline]
    fn seek_to_first(&mut self) {
        self.iter.seek_to_first();
    }

    #[inline]
    fn seek_to_last(&mut self) {
        self.iter.seek_to_last();
    }
}
