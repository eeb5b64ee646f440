/// The size of a [`WriteBatch`] header: an 8-byte sequence number, then a 4-byte count.
///
/// [`WriteBatch`]: crate::WriteBatch
pub(crate) const WRITE_BATCH_HEADER_LEN: usize = 12;

/// The default block size of a memtable's arena.
pub(crate) const DEFAULT_ARENA_BLOCK_SIZE: usize = strata_skiplist::arena::ARENA_BLOCK_SIZE;

/// The default seed for the node heights of a memtable's skiplist.
pub(crate) const DEFAULT_MEMTABLE_SEED: u64 = strata_skiplist::DEFAULT_SEED;
