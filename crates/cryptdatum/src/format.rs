//! Format constants for Cryptdatum v1 headers.

/// Current format version written by this crate.
pub const VERSION: u16 = 1;

/// Minimum format version accepted when validating.
pub const MIN_VERSION: u16 = 1;

/// Size of a header in bytes.
pub const HEADER_SIZE: usize = 64;

/// Magic prefix identifying a Cryptdatum header.
pub const MAGIC: [u8; 4] = [0xA7, 0xF6, 0xE5, 0xD4];

/// Delimiter closing the header region.
pub const DELIMITER: [u8; 2] = [0xA6, 0xE5];

/// Offset of the delimiter within the header.
pub const DELIMITER_OFFSET: usize = HEADER_SIZE - DELIMITER.len();

/// Earliest timestamp (ns since Unix epoch) a non-draft header may carry.
///
/// Corresponds to 2022-05-10T04:03:02.000000001Z.
pub const MAGIC_DATE: u64 = 1_652_155_382_000_000_001;
