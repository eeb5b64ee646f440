use std::{fmt::{Display, Formatter, Result as FmtResult}, result::Result as StdResult};

use thiserror::Error;


pub type Result<T> = StdResult<T, Error>;


/// A failed outcome, tagged with an [`ErrorCode`] and carrying a message.
///
/// Success is represented by the `Ok` variant of [`Result`].
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
#[error("{code}: {msg}")]
pub struct Error {
    pub code: ErrorCode,
    pub msg:  String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ErrorCode {
    NotFound        = 1,
    Corruption      = 2,
    NotSupported    = 3,
    InvalidArgument = 4,
    IoError         = 5,
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::NotFound        => "NotFound",
            Self::Corruption      => "Corruption",
            Self::NotSupported    => "Not implemented",
            Self::InvalidArgument => "Invalid argument",
            Self::IoError         => "IO error",
        })
    }
}

impl From<ErrorCode> for u8 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code as Self
    }
}

impl TryFrom<u8> for ErrorCode {
    type Error = ();

    fn try_from(code: u8) -> StdResult<Self, Self::Error> {
        match code {
            1 => Ok(Self::NotFound),
            2 => Ok(Self::Corruption),
            3 => Ok(Self::NotSupported),
            4 => Ok(Self::InvalidArgument),
            5 => Ok(Self::IoError),
            _ => Err(()),
        }
    }
}

impl Error {
    #[inline]
    #[must_use]
    pub fn new(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self { code, msg: msg.into() }
    }

    #[inline]
    #[must_use]
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, msg)
    }

    #[inline]
    #[must_use]
    pub fn corruption(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Corruption, msg)
    }

    #[inline]
    #[must_use]
    pub fn not_supported(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotSupported, msg)
    }

    #[inline]
    #[must_use]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, msg)
    }

    #[inline]
    #[must_use]
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::IoError, msg)
    }

    #[inline]
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }

    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::NotFound
    }

    #[inline]
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        self.code == ErrorCode::Corruption
    }

    #[inline]
    #[must_use]
    pub fn is_not_supported(&self) -> bool {
        self.code == ErrorCode::NotSupported
    }

    #[inline]
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        self.code == ErrorCode::InvalidArgument
    }

    #[inline]
    #[must_use]
    pub fn is_io_error(&self) -> bool {
        self.code == ErrorCode::IoError
    }

    /// The binary encoding of the error: the message length as a `u32` in little-endian order,
    /// then the code byte, then the message bytes.
    ///
    /// A message longer than `u32::MAX` bytes is truncated to that length.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let msg_len = u32::try_from(self.msg.len()).unwrap_or(u32::MAX);
        #[expect(clippy::as_conversions, reason = "`msg_len` is at most `self.msg.len()`")]
        let msg = self.msg.as_bytes().get(..msg_len as usize).unwrap_or_default();

        let mut output = Vec::with_capacity(5 + msg.len());
        output.extend(msg_len.to_le_bytes());
        output.push(u8::from(self.code));
        output.extend(msg);
        output
    }

    /// Parse the output of [`Error::encode`].
    ///
    /// Returns `None` if `encoded` has an unknown code, a length which does not match the
    /// message, or a message which is not UTF-8.
    #[must_use]
    pub fn decode(encoded: &[u8]) -> Option<Self> {
        let (len, rest) = encoded.split_first_chunk::<4>()?;
        let (&code, msg) = rest.split_first()?;

        let len = usize::try_from(u32::from_le_bytes(*len)).ok()?;
        if msg.len() != len {
            return None;
        }

        Some(Self {
            code: ErrorCode::try_from(code).ok()?,
            msg:  String::from_utf8(msg.to_vec()).ok()?,
        })
    }
}
