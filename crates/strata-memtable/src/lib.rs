//! LevelDB-style memtables: multi-version, in-memory tables of puts and deletions, ordered by
//! internal key and stored in an arena-backed skiplist.
//!
//! Each write to a [`Memtable`] carries a [`SequenceNumber`]. A read at some sequence number
//! sees the newest write to a key with a sequence number at most that one, and a deletion hides
//! every older value of its key. Several writes may be applied together as a [`WriteBatch`].

mod error;
mod format;
mod comparator;
mod config_constants;
mod options;
mod memtable;
mod write_batch;


pub use seekable_iterator::{Comparator, CursorIterator, Seekable};
pub use strata_skiplist::{BytewiseComparator, FnComparator, Reversed};

pub use self::{
    comparator::{MemtableComparator, cmp_internal_keys},
    error::{Error, ErrorCode, Result},
    format::{
        EntryType, InternalEntry, InternalKey, LookupKey, SequenceNumber, sequence_and_type_tag,
    },
    memtable::{Memtable, MemtableIter, SharedMemtable},
    options::MemtableOptions,
    write_batch::{WriteBatch, WriteBatchIter, WriteEntry},
};
