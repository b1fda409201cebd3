//! Decoded header record.

use std::time::SystemTime;

use crate::model::flag::{DatumFlag, DatumFlags};
use crate::util::datetime::to_time;

/// A Cryptdatum header.
///
/// Produced by [`decode_header`](crate::codec::decode_header) or
/// [`HeaderBuilder`](crate::model::HeaderBuilder). Field widths match the
/// wire format exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    /// Format version.
    pub version: u16,
    /// Feature flags.
    pub flags: DatumFlags,
    /// Creation time, nanoseconds since Unix epoch.
    pub timestamp: u64,
    /// Operation counter (OPC flag).
    pub opc: u32,
    /// Chunk size in KB (Chunked flag).
    pub chunk_size: u16,
    /// Source network identifier (Network flag).
    pub network_id: u32,
    /// Total payload size; 0 iff Empty.
    pub size: u64,
    /// Payload checksum (Checksum flag).
    pub checksum: u64,
    /// Compression algorithm id (Compressed flag).
    pub compression: u16,
    /// Encryption algorithm id (Encrypted flag).
    pub encryption: u16,
    /// Signature scheme id (Signed flag).
    pub signature_type: u16,
    /// Signature length in bytes (Signed flag).
    pub signature_size: u16,
    /// Metadata schema id (Metadata flag).
    pub metadata_spec: u16,
    /// Metadata length in bytes (Metadata flag).
    pub metadata_size: u32,
}

impl Header {
    /// Returns true if `flag` is set.
    #[inline]
    pub fn has_flag(&self, flag: DatumFlag) -> bool {
        self.flags.contains(flag)
    }

    /// Creation time as a clock value.
    pub fn created_at(&self) -> SystemTime {
        to_time(self.timestamp)
    }

    pub fn is_draft(&self) -> bool {
        self.has_flag(DatumFlag::Draft)
    }

    pub fn is_compromised(&self) -> bool {
        self.has_flag(DatumFlag::Compromised)
    }
}
