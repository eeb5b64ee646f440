mod iter;
mod shared;


use oorandom::Rand32;
use seekable_iterator::{Comparator, CursorIterator as _};
use tracing::Level;

use strata_skiplist::{ByteArena, ByteSkiplist, BytewiseComparator};

use crate::{comparator::MemtableComparator, options::MemtableOptions, write_batch::WriteBatch};
use crate::error::{Error, Result};
use crate::format::{InternalEntry, LookupKey, MemtableEntryEncoder, SequenceNumber};
use self::iter::decode_own_entry;
pub use self::{iter::MemtableIter, shared::SharedMemtable};


/// An in-memory, multi-version table of writes, ordered by internal key.
///
/// Every write is kept, tagged with its sequence number; a read at sequence number `s` sees the
/// newest write to its key with a sequence number of at most `s`. Writes are never removed
/// individually, and all memory is released when the memtable is dropped.
///
/// Callers must give distinct writes to the same user key distinct sequence numbers.
#[derive(Debug, Clone)]
pub struct Memtable<Cmp = BytewiseComparator> {
    /// Only [`Memtable::add`] inserts anything into this skiplist.
    list: ByteSkiplist<MemtableComparator<Cmp>>,
}

impl<Cmp: Comparator<[u8]>> Memtable<Cmp> {
    /// Create an empty memtable, ordering user keys with `cmp`.
    #[inline]
    #[must_use]
    pub fn new(cmp: Cmp) -> Self {
        Self::with_options(cmp, &MemtableOptions::default())
    }

    #[inline]
    #[must_use]
    pub fn new_seeded(cmp: Cmp, seed: u64) -> Self {
        Self::with_options(cmp, &MemtableOptions { seed, ..MemtableOptions::default() })
    }

    #[must_use]
    pub fn with_options(cmp: Cmp, options: &MemtableOptions) -> Self {
        Self {
            list: ByteSkiplist::with_arena(
                MemtableComparator(cmp),
                ByteArena::with_block_size(options.arena_block_size),
                Rand32::new(options.seed),
            ),
        }
    }

    /// The user-key comparator.
    #[inline]
    #[must_use]
    pub const fn comparator(&self) -> &Cmp {
        &self.list.comparator().0
    }

    /// Record a write to `user_key` at `sequence_number`: a put of `value` if it is `Some`,
    /// otherwise a deletion.
    ///
    /// # Panics
    /// Panics if the user key is longer than `u32::MAX - 8` bytes, or the value is longer than
    /// `u32::MAX` bytes.
    pub fn add(&mut self, sequence_number: SequenceNumber, user_key: &[u8], value: Option<&[u8]>) {
        let (entry_len, encoder) = MemtableEntryEncoder::start_encode(
            sequence_number,
            user_key,
            value,
        );
        // Sequence numbers are unique per write, so the entry is distinct from every other.
        self.list.insert_with(entry_len, |entry| encoder.encode_to(entry));
    }

    /// Equivalent to `self.add(sequence_number, user_key, Some(value))`.
    #[inline]
    pub fn put(&mut self, sequence_number: SequenceNumber, user_key: &[u8], value: &[u8]) {
        self.add(sequence_number, user_key, Some(value));
    }

    /// Equivalent to `self.add(sequence_number, user_key, None)`.
    #[inline]
    pub fn delete(&mut self, sequence_number: SequenceNumber, user_key: &[u8]) {
        self.add(sequence_number, user_key, None);
    }

    /// Get the value of the newest write to `user_key` with a sequence number of at most
    /// `sequence_number`.
    ///
    /// Returns a not-found error if there is no such write, or if that write is a deletion.
    /// If two writes to the key share the found sequence number, a corruption error is
    /// returned instead.
    pub fn get(&self, user_key: &[u8], sequence_number: SequenceNumber) -> Result<&[u8]> {
        match self.get_entry(user_key, sequence_number)? {
            Some(InternalEntry { value: Some(value), .. }) => Ok(value),
            Some(InternalEntry { value: None, sequence_number: deleted_at, .. }) => {
                Err(Error::not_found(format!("key deleted at sequence number {}", deleted_at.inner())))
            }
            None => Err(Error::not_found("key not present in memtable")),
        }
    }

    /// Get the newest write to `user_key` with a sequence number of at most `sequence_number`,
    /// whether it is a value or a deletion.
    ///
    /// Returns a corruption error if another write to the key has the same sequence number as
    /// the found write.
    pub fn get_entry(
        &self,
        user_key:        &[u8],
        sequence_number: SequenceNumber,
    ) -> Result<Option<InternalEntry<'_>>> {
        let lookup_key = LookupKey::new(user_key, sequence_number);
        // Since `MemtableComparator` sorts sequence numbers and entry types in decreasing order,
        // and the lookup key has `EntryType::MAX_TYPE`, this finds either:
        // 1. nothing,
        // 2. an entry with a different user key, or
        // 3. the newest entry with the correct user key and a sequence number of at most
        //    `sequence_number`.
        let mut iter = self.list.seek(lookup_key.memtable_key());

        let Some(found) = iter.current().map(decode_own_entry) else {
            return Ok(None);
        };
        if !self.comparator().cmp(found.user_key, user_key).is_eq() {
            return Ok(None);
        }

        let conflict = iter.next().map(decode_own_entry).is_some_and(|next| {
            next.sequence_number == found.sequence_number
                && self.comparator().cmp(next.user_key, user_key).is_eq()
        });

        if conflict {
            tracing::event!(
                Level::WARN,
                "memtable holds conflicting writes at sequence number {}",
                found.sequence_number.inner(),
            );
            return Err(Error::corruption(format!(
                "multiple writes to one key at sequence number {}",
                found.sequence_number.inner(),
            )));
        }

        Ok(Some(found))
    }

    /// Record every write of `batch`, giving the `i`-th record the sequence number
    /// `batch.sequence() + i`.
    ///
    /// Nothing is written if the batch is malformed (a corruption error), or if a sequence
    /// number would exceed [`SequenceNumber::MAX_SEQUENCE_NUMBER`] (an invalid-argument error).
    pub fn insert_write_batch(&mut self, batch: &WriteBatch) -> Result<()> {
        let first = SequenceNumber::try_from(batch.sequence())?;
        let entries = batch.iter().collect::<Result<Vec<_>>>()?;

        let out_of_range = || Error::invalid_argument(format!(
            "write batch of {} records starting at sequence number {} exceeds the maximum",
            entries.len(),
            first.inner(),
        ));

        if let Some(last_offset) = entries.len().checked_sub(1) {
            let last_offset = u64::try_from(last_offset).map_err(|_| out_of_range())?;
            first.checked_add(last_offset).ok_or_else(out_of_range)?;
        }

        tracing::event!(
            Level::DEBUG,
            "replaying write batch of {} records starting at sequence number {}",
            entries.len(),
            first.inner(),
        );

        let mut sequence_number = first;
        for (idx, entry) in entries.iter().enumerate() {
            if idx > 0 {
                sequence_number = sequence_number.checked_add(1).ok_or_else(out_of_range)?;
            }
            self.add(sequence_number, entry.key(), entry.value());
        }

        Ok(())
    }

    /// An iterator over every write in the memtable, in internal-key order, starting at the end
    /// position.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> MemtableIter<'_, Cmp> {
        MemtableIter::new(&self.list)
    }

    /// A close lower bound on the number of bytes allocated by this memtable.
    #[inline]
    #[must_use]
    pub fn approximate_memory_usage(&self) -> usize {
        self.list.allocated_bytes()
    }

    /// The number of writes recorded, including deletions.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl<Cmp: Comparator<[u8]> + Default> Default for Memtable<Cmp> {
    #[inline]
    fn default() -> Self {
        Self::new(Cmp::default())
    }
}


#[cfg(test)]
mod tests {
    use super::*;


    fn seq(sequence_number: u32) -> SequenceNumber {
        SequenceNumber::from(sequence_number)
    }

    #[test]
    fn entries_are_ordered_newest_first() {
        let mut memtable = Memtable::new_seeded(BytewiseComparator, 3);
        memtable.put(seq(1), b"b", b"b1");
        memtable.put(seq(2), b"a", b"a2");
        memtable.delete(seq(3), b"b");
        memtable.put(seq(1), b"a", b"a1");

        let order = memtable.iter()
            .map(|entry| (entry.user_key, entry.sequence_number.inner(), entry.value))
            .collect::<Vec<_>>();

        let expected: [(&[u8], u64, Option<&[u8]>); 4] = [
            (b"a", 2, Some(b"a2")),
            (b"a", 1, Some(b"a1")),
            (b"b", 3, None),
            (b"b", 1, Some(b"b1")),
        ];
        assert_eq!(order, expected);
    }

    #[test]
    fn get_entry_exposes_deletions() {
        let mut memtable = Memtable::new(BytewiseComparator);
        memtable.put(seq(1), b"k", b"v");
        memtable.delete(seq(2), b"k");

        let entry = memtable.get_entry(b"k", seq(5)).unwrap().unwrap();
        assert_eq!(entry.sequence_number, seq(2));
        assert_eq!(entry.value, None);

        assert_eq!(memtable.get_entry(b"k", SequenceNumber::ZERO).unwrap(), None);
    }

    #[test]
    fn small_arena_blocks() {
        let options = MemtableOptions { seed: 1, arena_block_size: 64 };
        let mut memtable = Memtable::with_options(BytewiseComparator, &options);

        for n in 0..100_u32 {
            memtable.put(seq(n), &n.to_be_bytes(), &[7; 40]);
        }

        assert_eq!(memtable.len(), 100);
        assert_eq!(memtable.get(&42_u32.to_be_bytes(), seq(99)).unwrap(), [7; 40].as_slice());
        assert!(memtable.approximate_memory_usage() >= 100 * 40);
    }
}
