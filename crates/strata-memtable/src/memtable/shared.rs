use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};
use seekable_iterator::Comparator;

use strata_skiplist::BytewiseComparator;

use crate::{error::Result, format::SequenceNumber, write_batch::WriteBatch};
use super::Memtable;


/// A reference-counted [`Memtable`] which may be written by one thread while others read it.
///
/// Writers take an exclusive lock, so inserts are serialized; readers share a lock, and never
/// observe a partially-linked entry.
#[derive(Debug)]
pub struct SharedMemtable<Cmp = BytewiseComparator> {
    memtable: Arc<RwLock<Memtable<Cmp>>>,
}

impl<Cmp: Comparator<[u8]>> SharedMemtable<Cmp> {
    #[inline]
    #[must_use]
    pub fn new(memtable: Memtable<Cmp>) -> Self {
        Self {
            memtable: Arc::new(RwLock::new(memtable)),
        }
    }

    /// See [`Memtable::add`].
    pub fn add(&self, sequence_number: SequenceNumber, user_key: &[u8], value: Option<&[u8]>) {
        self.memtable.write().add(sequence_number, user_key, value);
    }

    #[inline]
    pub fn put(&self, sequence_number: SequenceNumber, user_key: &[u8], value: &[u8]) {
        self.add(sequence_number, user_key, Some(value));
    }

    #[inline]
    pub fn delete(&self, sequence_number: SequenceNumber, user_key: &[u8]) {
        self.add(sequence_number, user_key, None);
    }

    /// See [`Memtable::insert_write_batch`]. The whole batch is applied under one lock, so
    /// readers see either none of it or all of it.
    pub fn insert_write_batch(&self, batch: &WriteBatch) -> Result<()> {
        self.memtable.write().insert_write_batch(batch)
    }

    /// See [`Memtable::get`]. The value is copied out, so that the lock is not held.
    pub fn get(&self, user_key: &[u8], sequence_number: SequenceNumber) -> Result<Vec<u8>> {
        self.memtable.read()
            .get(user_key, sequence_number)
            .map(<[u8]>::to_vec)
    }

    /// Lock the memtable for reading, for instance to iterate over it.
    ///
    /// Writers block until the guard is dropped.
    #[inline]
    #[must_use]
    pub fn read(&self) -> RwLockReadGuard<'_, Memtable<Cmp>> {
        self.memtable.read()
    }

    #[must_use]
    pub fn approximate_memory_usage(&self) -> usize {
        self.memtable.read().approximate_memory_usage()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.memtable.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.memtable.read().is_empty()
    }
}

impl<Cmp: Comparator<[u8]>> From<Memtable<Cmp>> for SharedMemtable<Cmp> {
    #[inline]
    fn from(memtable: Memtable<Cmp>) -> Self {
        Self::new(memtable)
    }
}

impl<Cmp> Clone for SharedMemtable<Cmp> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            memtable: Arc::clone(&self.memtable),
        }
    }
}
