use crate::config_constants::{DEFAULT_ARENA_BLOCK_SIZE, DEFAULT_MEMTABLE_SEED};


/// Settings for constructing a [`Memtable`].
///
/// [`Memtable`]: crate::Memtable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemtableOptions {
    /// Seeds the random node heights of the memtable's skiplist. Two memtables with the same
    /// seed and the same writes have the same shape.
    pub seed:             u64,
    /// The size of the blocks in which entries are stored. Entries larger than a quarter of this
    /// get a block of their own.
    pub arena_block_size: usize,
}

impl Default for MemtableOptions {
    #[inline]
    fn default() -> Self {
        Self {
            seed:             DEFAULT_MEMTABLE_SEED,
            arena_block_size: DEFAULT_ARENA_BLOCK_SIZE,
        }
    }
}
