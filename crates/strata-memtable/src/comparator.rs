use std::cmp::Ordering;

use seekable_iterator::Comparator;

use crate::format::{InternalKey, memtable_entry_internal_key};


/// Compare internal keys: user keys in the order given by `cmp`, then sequence numbers in
/// decreasing order, then entry types in decreasing order.
///
/// For any user key, the newest write therefore sorts first.
#[must_use]
pub fn cmp_internal_keys<Cmp>(cmp: &Cmp, lhs: InternalKey<'_>, rhs: InternalKey<'_>) -> Ordering
where
    Cmp: ?Sized + Comparator<[u8]>,
{
    cmp.cmp(lhs.user_key, rhs.user_key)
        // The tag's upper bits are the sequence number and its lowest byte is the entry type,
        // so one reversed comparison covers both.
        .then_with(|| Ord::cmp(&rhs.tag(), &lhs.tag()))
}

/// Orders the encoded entries of a memtable's skiplist by their internal keys, using
/// a user-key comparator.
#[derive(Default, Debug, Clone, Copy)]
pub struct MemtableComparator<Cmp>(pub Cmp);

impl<Cmp: Comparator<[u8]>> Comparator<[u8]> for MemtableComparator<Cmp> {
    /// # Panics
    /// Panics if either entry does not begin with a length-prefixed internal key. Every entry
    /// of a memtable, and every [`LookupKey`], does.
    ///
    /// [`LookupKey`]: crate::LookupKey
    fn cmp(&self, lhs: &[u8], rhs: &[u8]) -> Ordering {
        #[expect(clippy::expect_used, reason = "the memtable only compares entries it encoded")]
        fn decode(entry: &[u8]) -> InternalKey<'_> {
            memtable_entry_internal_key(entry)
                .and_then(InternalKey::decode)
                .expect("memtable entries start with a valid internal key")
        }

        cmp_internal_keys(&self.0, decode(lhs), decode(rhs))
    }
}


#[cfg(test)]
mod tests {
    use strata_skiplist::{BytewiseComparator, Reversed};

    use crate::format::{EntryType, SequenceNumber};
    use super::*;


    fn key(user_key: &[u8], sequence_number: u32, entry_type: EntryType) -> InternalKey<'_> {
        InternalKey {
            user_key,
            sequence_number: SequenceNumber::from(sequence_number),
            entry_type,
        }
    }

    #[test]
    fn internal_key_order() {
        let cmp = BytewiseComparator;

        let ordering = |lhs, rhs| cmp_internal_keys(&cmp, lhs, rhs);

        // User keys first.
        assert!(ordering(key(b"a", 1, EntryType::Value), key(b"b", 9, EntryType::Value)).is_lt());
        // Then newer sequence numbers first.
        assert!(ordering(key(b"a", 5, EntryType::Value), key(b"a", 4, EntryType::Value)).is_lt());
        // Then values before deletions.
        assert!(ordering(key(b"a", 5, EntryType::Value), key(b"a", 5, EntryType::Deletion)).is_lt());
        assert!(ordering(key(b"a", 5, EntryType::Value), key(b"a", 5, EntryType::Value)).is_eq());
    }

    #[test]
    fn reversed_user_keys() {
        let cmp = Reversed(BytewiseComparator);
        let lhs = key(b"alpha", 1, EntryType::Value);
        let rhs = key(b"beta", 1, EntryType::Value);

        assert!(cmp_internal_keys(&cmp, lhs, rhs).is_gt());
    }
}
