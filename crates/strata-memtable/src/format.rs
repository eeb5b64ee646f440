use std::result::Result as StdResult;

use integer_encoding::VarInt as _;

use crate::error::{Error, Result};


// ================================================================
//  Sequence numbers and entry types
// ================================================================

/// The sequence number of a write. Sequence numbers occupy the upper 56 bits of an entry's
/// 64-bit tag, so they are at most [`SequenceNumber::MAX_SEQUENCE_NUMBER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct SequenceNumber(u64);

impl SequenceNumber {
    pub const ZERO: Self = Self(0);
    pub const MAX_SEQUENCE_NUMBER: Self = Self((1 << 56) - 1);

    /// Returns `None` if `sequence_number` exceeds [`SequenceNumber::MAX_SEQUENCE_NUMBER`].
    #[inline]
    #[must_use]
    pub const fn new(sequence_number: u64) -> Option<Self> {
        if sequence_number <= Self::MAX_SEQUENCE_NUMBER.0 {
            Some(Self(sequence_number))
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub const fn inner(self) -> u64 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn checked_add(self, other: u64) -> Option<Self> {
        match self.0.checked_add(other) {
            Some(sum) => Self::new(sum),
            None      => None,
        }
    }
}

impl From<u32> for SequenceNumber {
    #[inline]
    fn from(sequence_number: u32) -> Self {
        Self(u64::from(sequence_number))
    }
}

impl TryFrom<u64> for SequenceNumber {
    type Error = Error;

    fn try_from(sequence_number: u64) -> Result<Self> {
        Self::new(sequence_number).ok_or_else(|| Error::invalid_argument(format!(
            "sequence number {sequence_number} exceeds the maximum of {}",
            Self::MAX_SEQUENCE_NUMBER.0,
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum EntryType {
    Deletion = 0,
    Value    = 1,
}

impl EntryType {
    pub const MIN_TYPE: Self = Self::Deletion;
    /// Among entries with the same user key and sequence number, the entry type which sorts
    /// first.
    pub const MAX_TYPE: Self = Self::Value;
}

impl From<EntryType> for u8 {
    #[inline]
    fn from(entry_type: EntryType) -> Self {
        entry_type as Self
    }
}

impl TryFrom<u8> for EntryType {
    type Error = ();

    #[inline]
    fn try_from(entry_type: u8) -> StdResult<Self, Self::Error> {
        match entry_type {
            0 => Ok(Self::Deletion),
            1 => Ok(Self::Value),
            _ => Err(()),
        }
    }
}

/// The sequence number in the upper 56 bits, and the entry type in the lower 8 bits.
#[inline]
#[must_use]
pub const fn sequence_and_type_tag(sequence_number: SequenceNumber, entry_type: EntryType) -> u64 {
    #[expect(clippy::as_conversions, reason = "`From` conversions do not yet work in const")]
    let entry_type = entry_type as u64;
    (sequence_number.0 << 8) | entry_type
}

/// The number of bytes a tag occupies at the end of an encoded internal key.
pub(crate) const TAG_LEN: usize = 8;

// ================================================================
//  Internal keys
// ================================================================

/// A user key, together with the sequence number and type of the write which produced it.
///
/// Encoded as the user key followed by the 8-byte little-endian
/// [tag](sequence_and_type_tag).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternalKey<'a> {
    pub user_key:        &'a [u8],
    pub sequence_number: SequenceNumber,
    pub entry_type:      EntryType,
}

impl<'a> InternalKey<'a> {
    pub fn decode(encoded: &'a [u8]) -> Result<Self> {
        let user_key_len = encoded.len()
            .checked_sub(TAG_LEN)
            .ok_or_else(|| Error::corruption("internal key shorter than its tag"))?;

        let (user_key, tag) = encoded.split_at(user_key_len);
        let tag = tag.try_into().map(u64::from_le_bytes)
            .map_err(|_| Error::corruption("internal key shorter than its tag"))?;

        #[expect(clippy::cast_possible_truncation, reason = "the entry type is the lowest byte")]
        let entry_type = EntryType::try_from(tag as u8)
            .map_err(|()| Error::corruption(format!("unknown entry type {}", tag & 0xff)))?;

        Ok(Self {
            user_key,
            sequence_number: SequenceNumber(tag >> 8),
            entry_type,
        })
    }

    #[inline]
    #[must_use]
    pub const fn tag(&self) -> u64 {
        sequence_and_type_tag(self.sequence_number, self.entry_type)
    }

    #[inline]
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        self.user_key.len() + TAG_LEN
    }

    #[inline]
    pub fn append_encoded(&self, output: &mut Vec<u8>) {
        output.extend(self.user_key);
        output.extend(self.tag().to_le_bytes());
    }
}

// ================================================================
//  Memtable entries
// ================================================================

/// A decoded entry of a memtable: the newest write to `user_key` visible at some sequence
/// number, or any write when iterating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternalEntry<'a> {
    pub user_key:        &'a [u8],
    pub sequence_number: SequenceNumber,
    /// `None` for a deletion.
    pub value:           Option<&'a [u8]>,
}

impl InternalEntry<'_> {
    #[inline]
    #[must_use]
    pub const fn entry_type(&self) -> EntryType {
        if self.value.is_some() {
            EntryType::Value
        } else {
            EntryType::Deletion
        }
    }

    #[inline]
    #[must_use]
    pub const fn internal_key(&self) -> InternalKey<'_> {
        InternalKey {
            user_key:        self.user_key,
            sequence_number: self.sequence_number,
            entry_type:      self.entry_type(),
        }
    }
}

/// Split a varint32-length-prefixed slice off the front of `src`, returning the slice and
/// whatever follows it.
fn split_length_prefixed(src: &[u8]) -> Option<(&[u8], &[u8])> {
    let (len, varint_len) = u32::decode_var(src)?;
    let len = usize::try_from(len).ok()?;
    let rest = src.get(varint_len..)?;

    if len <= rest.len() {
        Some(rest.split_at(len))
    } else {
        None
    }
}

/// The encoded internal key at the start of an encoded memtable entry (or lookup key).
///
/// A memtable entry is encoded as:
/// - varint32 length of the internal key,
/// - the encoded [`InternalKey`],
/// - varint32 length of the value,
/// - the value, which is empty for a deletion.
pub(crate) fn memtable_entry_internal_key(entry: &[u8]) -> Result<&[u8]> {
    split_length_prefixed(entry)
        .map(|(internal_key, _)| internal_key)
        .ok_or_else(|| Error::corruption("truncated internal key in memtable entry"))
}

pub(crate) fn decode_memtable_entry(entry: &[u8]) -> Result<InternalEntry<'_>> {
    let (internal_key, rest) = split_length_prefixed(entry)
        .ok_or_else(|| Error::corruption("truncated internal key in memtable entry"))?;
    let internal_key = InternalKey::decode(internal_key)?;

    let (value, _) = split_length_prefixed(rest)
        .ok_or_else(|| Error::corruption("truncated value in memtable entry"))?;

    Ok(InternalEntry {
        user_key:        internal_key.user_key,
        sequence_number: internal_key.sequence_number,
        value:           match internal_key.entry_type {
            EntryType::Value    => Some(value),
            EntryType::Deletion => None,
        },
    })
}

/// Computes the length of a memtable entry, then writes it into a buffer of that length.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MemtableEntryEncoder<'a> {
    user_key:         &'a [u8],
    tag:              u64,
    value:            &'a [u8],
    internal_key_len: u32,
    value_len:        u32,
}

impl<'a> MemtableEntryEncoder<'a> {
    /// Returns the length of the encoded entry, and an encoder to write it.
    ///
    /// # Panics
    /// Panics if the user key is longer than `u32::MAX - 8` bytes, or the value is longer than
    /// `u32::MAX` bytes.
    #[expect(clippy::expect_used, reason = "such keys or values cannot be length-prefixed")]
    #[must_use]
    pub(crate) fn start_encode(
        sequence_number: SequenceNumber,
        user_key:        &'a [u8],
        value:           Option<&'a [u8]>,
    ) -> (usize, Self) {
        let entry_type = if value.is_some() { EntryType::Value } else { EntryType::Deletion };
        let value = value.unwrap_or_default();

        let internal_key_len = u32::try_from(user_key.len() + TAG_LEN)
            .expect("a memtable user key must be shorter than 4 GiB");
        let value_len = u32::try_from(value.len())
            .expect("a memtable value must be shorter than 4 GiB");

        let entry_len = internal_key_len.required_space()
            + user_key.len()
            + TAG_LEN
            + value_len.required_space()
            + value.len();

        let encoder = Self {
            user_key,
            tag: sequence_and_type_tag(sequence_number, entry_type),
            value,
            internal_key_len,
            value_len,
        };

        (entry_len, encoder)
    }

    /// # Panics
    /// Panics if `output` is not exactly the length returned by [`start_encode`].
    ///
    /// [`start_encode`]: MemtableEntryEncoder::start_encode
    pub(crate) fn encode_to(self, output: &mut [u8]) {
        let mut written = self.internal_key_len.encode_var(output);
        written += copy_at(output, written, self.user_key);
        written += copy_at(output, written, &self.tag.to_le_bytes());

        #[expect(clippy::indexing_slicing, reason = "output has room for the whole entry")]
        {
            written += self.value_len.encode_var(&mut output[written..]);
        }
        written += copy_at(output, written, self.value);

        assert_eq!(written, output.len(), "memtable entry buffer had the wrong length");
    }
}

#[expect(clippy::indexing_slicing, reason = "callers size `output` for every copy")]
fn copy_at(output: &mut [u8], offset: usize, src: &[u8]) -> usize {
    output[offset..offset + src.len()].copy_from_slice(src);
    src.len()
}

/// A synthetic memtable entry used only to seek: the newest entry for `user_key` whose
/// sequence number is at most `sequence_number` is the first entry at or after it.
///
/// Its tag uses [`EntryType::MAX_TYPE`], so that it sorts before every real entry with the
/// same user key and sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupKey {
    /// The length-prefixed internal key; a prefix of a memtable entry's encoding.
    memtable_key:    Vec<u8>,
    prefix_len:      usize,
    sequence_number: SequenceNumber,
}

impl LookupKey {
    /// # Panics
    /// Panics if the user key is longer than `u32::MAX - 8` bytes.
    #[expect(clippy::expect_used, reason = "such keys cannot be length-prefixed")]
    #[must_use]
    pub fn new(user_key: &[u8], sequence_number: SequenceNumber) -> Self {
        let internal_key = InternalKey {
            user_key,
            sequence_number,
            entry_type: EntryType::MAX_TYPE,
        };
        let internal_key_len = u32::try_from(internal_key.encoded_len())
            .expect("a lookup key must be shorter than 4 GiB");
        let prefix_len = internal_key_len.required_space();

        let mut memtable_key = vec![0; prefix_len];
        internal_key_len.encode_var(&mut memtable_key);
        internal_key.append_encoded(&mut memtable_key);

        Self { memtable_key, prefix_len, sequence_number }
    }

    /// The encoding compared against memtable entries.
    #[inline]
    #[must_use]
    pub fn memtable_key(&self) -> &[u8] {
        &self.memtable_key
    }

    #[expect(clippy::indexing_slicing, reason = "the prefix is part of the key")]
    #[inline]
    #[must_use]
    pub fn internal_key(&self) -> &[u8] {
        &self.memtable_key[self.prefix_len..]
    }

    #[expect(clippy::indexing_slicing, reason = "the internal key ends with a full tag")]
    #[inline]
    #[must_use]
    pub fn user_key(&self) -> &[u8] {
        &self.memtable_key[self.prefix_len..self.memtable_key.len() - TAG_LEN]
    }

    #[inline]
    #[must_use]
    pub const fn sequence_number(&self) -> SequenceNumber {
        self.sequence_number
    }
}
