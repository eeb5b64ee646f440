use std::iter::FusedIterator;

use crate::{config_constants::WRITE_BATCH_HEADER_LEN, format::EntryType};
use crate::error::{Error, Result};


/// One operation of a [`WriteBatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteEntry<'a> {
    Value {
        key:   &'a [u8],
        value: &'a [u8],
    },
    Deletion {
        key:   &'a [u8],
    },
}

impl<'a> WriteEntry<'a> {
    #[inline]
    #[must_use]
    pub const fn key(&self) -> &'a [u8] {
        match self {
            Self::Value { key, .. } | Self::Deletion { key } => *key,
        }
    }

    /// The value written, or `None` for a deletion.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> Option<&'a [u8]> {
        match self {
            Self::Value { value, .. } => Some(*value),
            Self::Deletion { .. }     => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn entry_type(&self) -> EntryType {
        match self {
            Self::Value { .. }    => EntryType::Value,
            Self::Deletion { .. } => EntryType::Deletion,
        }
    }
}

/// An ordered collection of puts and deletions, applied together with consecutive sequence
/// numbers.
///
/// The batch is kept in its encoded form:
/// - an 8-byte little-endian starting sequence number,
/// - a 4-byte little-endian count of records,
/// - the records, each an [`EntryType`] byte, then the key, then (for values) the value. Keys
///   and values are each prefixed with their length as a 4-byte little-endian integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WriteBatch {
    rep: Vec<u8>,
}

impl WriteBatch {
    /// An empty batch with a starting sequence number of zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            rep: vec![0; WRITE_BATCH_HEADER_LEN],
        }
    }

    /// Wrap an encoded batch, such as the [`contents`] of another batch.
    ///
    /// Only the header is validated here; malformed records are reported by [`iter`].
    ///
    /// [`contents`]: WriteBatch::contents
    /// [`iter`]: WriteBatch::iter
    pub fn from_contents(contents: Vec<u8>) -> Result<Self> {
        if contents.len() < WRITE_BATCH_HEADER_LEN {
            return Err(Error::corruption(format!(
                "write batch of {} bytes is too small for its header",
                contents.len(),
            )));
        }

        Ok(Self { rep: contents })
    }

    /// Remove every record, and reset the starting sequence number to zero.
    pub fn clear(&mut self) {
        self.rep.clear();
        self.rep.resize(WRITE_BATCH_HEADER_LEN, 0);
    }

    /// The sequence number given to the first record, when the batch is applied.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        let mut bytes = [0; 8];
        bytes.copy_from_slice(self.header(0..8));
        u64::from_le_bytes(bytes)
    }

    pub fn set_sequence(&mut self, sequence: u64) {
        self.header_mut(0..8).copy_from_slice(&sequence.to_le_bytes());
    }

    /// The number of records in the batch.
    #[must_use]
    pub fn count(&self) -> u32 {
        let mut bytes = [0; 4];
        bytes.copy_from_slice(self.header(8..12));
        u32::from_le_bytes(bytes)
    }

    fn set_count(&mut self, count: u32) {
        self.header_mut(8..12).copy_from_slice(&count.to_le_bytes());
    }

    /// The size of the encoded batch, in bytes.
    #[inline]
    #[must_use]
    pub fn approximate_size(&self) -> usize {
        self.rep.len()
    }

    /// The encoded batch.
    #[inline]
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        &self.rep
    }

    /// # Panics
    /// Panics if the key or value is at least 4 GiB long, or if the batch already holds
    /// `u32::MAX` records.
    pub fn put(&mut self, key: &[u8], value: &[u8]) {
        self.push_record(EntryType::Value, key, Some(value));
    }

    /// # Panics
    /// Panics if the key is at least 4 GiB long, or if the batch already holds `u32::MAX`
    /// records.
    pub fn delete(&mut self, key: &[u8]) {
        self.push_record(EntryType::Deletion, key, None);
    }

    /// Append the records of `other` to `self`. The starting sequence number of `self` is kept.
    ///
    /// # Panics
    /// Panics if the combined batch would hold more than `u32::MAX` records.
    #[expect(clippy::expect_used, reason = "record counts are bounded like any other allocation")]
    pub fn append(&mut self, other: &Self) {
        let count = self.count()
            .checked_add(other.count())
            .expect("a write batch may hold at most u32::MAX records");
        self.set_count(count);

        self.rep.extend(other.records());
    }

    /// Iterate over the records of the batch, in the order they were added.
    ///
    /// A truncated or unrecognized record, or a record count which does not match the header,
    /// is reported as a corruption error, after which the iterator ends.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> WriteBatchIter<'_> {
        WriteBatchIter {
            records:   self.records(),
            remaining: self.count(),
            failed:    false,
        }
    }

    #[expect(clippy::expect_used, reason = "record sizes are bounded like any other allocation")]
    fn push_record(&mut self, entry_type: EntryType, key: &[u8], value: Option<&[u8]>) {
        let count = self.count()
            .checked_add(1)
            .expect("a write batch may hold at most u32::MAX records");
        self.set_count(count);

        self.rep.push(u8::from(entry_type));
        self.push_length_prefixed(key);
        if let Some(value) = value {
            self.push_length_prefixed(value);
        }
    }

    #[expect(clippy::expect_used, reason = "record sizes are bounded like any other allocation")]
    fn push_length_prefixed(&mut self, bytes: &[u8]) {
        let len = u32::try_from(bytes.len())
            .expect("write batch keys and values must be shorter than 4 GiB");

        self.rep.extend(len.to_le_bytes());
        self.rep.extend(bytes);
    }

    #[expect(clippy::indexing_slicing, reason = "`rep` always holds a full header")]
    fn header(&self, range: std::ops::Range<usize>) -> &[u8] {
        &self.rep[range]
    }

    #[expect(clippy::indexing_slicing, reason = "`rep` always holds a full header")]
    fn header_mut(&mut self, range: std::ops::Range<usize>) -> &mut [u8] {
        &mut self.rep[range]
    }

    #[expect(clippy::indexing_slicing, reason = "`rep` always holds a full header")]
    fn records(&self) -> &[u8] {
        &self.rep[WRITE_BATCH_HEADER_LEN..]
    }
}

impl Default for WriteBatch {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a WriteBatch {
    type Item     = Result<WriteEntry<'a>>;
    type IntoIter = WriteBatchIter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The records of a [`WriteBatch`]. See [`WriteBatch::iter`].
#[derive(Debug, Clone)]
pub struct WriteBatchIter<'a> {
    records:   &'a [u8],
    remaining: u32,
    failed:    bool,
}

impl<'a> WriteBatchIter<'a> {
    fn parse_record(&mut self) -> Result<WriteEntry<'a>> {
        let (&entry_type, rest) = self.records
            .split_first()
            .ok_or_else(|| Error::corruption("write batch has fewer records than its count"))?;
        self.records = rest;

        let entry_type = EntryType::try_from(entry_type).map_err(|()| {
            Error::corruption(format!("unknown write batch record type {entry_type}"))
        })?;

        let key = self.length_prefixed()?;
        Ok(match entry_type {
            EntryType::Value    => WriteEntry::Value { key, value: self.length_prefixed()? },
            EntryType::Deletion => WriteEntry::Deletion { key },
        })
    }

    fn length_prefixed(&mut self) -> Result<&'a [u8]> {
        let truncated = || Error::corruption("truncated write batch record");

        let (len, rest) = self.records.split_first_chunk::<4>().ok_or_else(truncated)?;
        let len = usize::try_from(u32::from_le_bytes(*len)).map_err(|_| truncated())?;

        if len > rest.len() {
            return Err(truncated());
        }
        let (bytes, rest) = rest.split_at(len);
        self.records = rest;
        Ok(bytes)
    }
}

impl<'a> Iterator for WriteBatchIter<'a> {
    type Item = Result<WriteEntry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        if self.remaining == 0 {
            if self.records.is_empty() {
                return None;
            }
            self.failed = true;
            return Some(Err(Error::corruption("write batch has more records than its count")));
        }

        self.remaining -= 1;
        let record = self.parse_record();
        self.failed = record.is_err();
        Some(record)
    }
}

impl FusedIterator for WriteBatchIter<'_> {}
