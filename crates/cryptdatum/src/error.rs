//! Error types for Cryptdatum header decoding, encoding and validation.

use thiserror::Error;

use crate::codec::layout::Field;
use crate::model::DatumFlag;

/// Coarse classification of a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The underlying reader failed.
    Io,
    /// Fewer than [`HEADER_SIZE`](crate::format::HEADER_SIZE) bytes were available.
    UnexpectedEof,
    /// Magic or delimiter mismatch: not Cryptdatum data.
    UnsupportedFormat,
    /// Cryptdatum data with an inconsistent header.
    InvalidHeader,
}

impl ErrorKind {
    /// Returns a stable name for this kind (e.g. "unsupported_format").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Io => "io",
            ErrorKind::UnexpectedEof => "unexpected_eof",
            ErrorKind::UnsupportedFormat => "unsupported_format",
            ErrorKind::InvalidHeader => "invalid_header",
        }
    }
}

/// Error during header decoding.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cryptdatum i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// `read` is the number of bytes that were left for `context`.
    #[error("cryptdatum unexpected end of input while reading {context} (got {read} bytes)")]
    UnexpectedEof { context: &'static str, read: usize },

    #[error("cryptdatum unsupported format: magic or delimiter mismatch")]
    UnsupportedFormat,

    #[error("cryptdatum invalid header: {0}")]
    InvalidHeader(#[source] ValidationError),
}

impl DecodeError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::Io(_) => ErrorKind::Io,
            DecodeError::UnexpectedEof { .. } => ErrorKind::UnexpectedEof,
            DecodeError::UnsupportedFormat => ErrorKind::UnsupportedFormat,
            DecodeError::InvalidHeader(_) => ErrorKind::InvalidHeader,
        }
    }
}

/// Error during header encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("refusing to encode invalid header: {0}")]
    InvalidHeader(#[source] ValidationError),
}

/// First consistency rule a header violates.
///
/// Variants are listed in the order the validator checks them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no header: data is too short or magic/delimiter do not match")]
    MissingHeader,

    #[error("unsupported version: {version}")]
    UnsupportedVersion { version: u16 },

    #[error("datum is flagged as compromised")]
    Compromised,

    #[error("timestamp {timestamp} is older than the format epoch")]
    TimestampBeforeMagicDate { timestamp: u64 },

    #[error("{flag} is set but {field} is empty")]
    MissingField { flag: DatumFlag, field: Field },

    #[error("{field} is set but {flag} is not")]
    UnexpectedField { flag: DatumFlag, field: Field },

    #[error("DATUM EMPTY is set but size is {size}")]
    EmptyWithSize { size: u64 },

    #[error("size is 0 but DATUM EMPTY is not set")]
    MissingSize,
}

impl ValidationError {
    /// Returns the header field the failing rule inspected.
    pub fn field(&self) -> Field {
        match self {
            ValidationError::MissingHeader => Field::Magic,
            ValidationError::UnsupportedVersion { .. } => Field::Version,
            ValidationError::Compromised => Field::Flags,
            ValidationError::TimestampBeforeMagicDate { .. } => Field::Timestamp,
            ValidationError::MissingField { field, .. }
            | ValidationError::UnexpectedField { field, .. } => *field,
            ValidationError::EmptyWithSize { .. } | ValidationError::MissingSize => Field::Size,
        }
    }
}
