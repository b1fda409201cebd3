//! Builder API for ergonomic Header construction.
//!
//! Feature setters write the field and its flag together, so a header built
//! without raw [`HeaderBuilder::flag`] calls passes validation as long as the
//! timestamp is not older than [`MAGIC_DATE`].
//!
//! # Example
//!
//! ```rust
//! use cryptdatum::{DatumFlag, HeaderBuilder, has_valid_header};
//!
//! let header = HeaderBuilder::new()
//!     .size(1024)
//!     .compression(1)
//!     .checksum(0xDEAD_BEEF)
//!     .build();
//!
//! assert!(header.has_flag(DatumFlag::Compressed));
//! assert!(!header.has_flag(DatumFlag::Empty));
//!
//! let bytes = cryptdatum::encode_header(&header).unwrap();
//! assert!(has_valid_header(&bytes));
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use crate::codec::encode_header;
use crate::error::EncodeError;
use crate::format::{HEADER_SIZE, MAGIC_DATE, VERSION};
use crate::model::{DatumFlag, Header};

/// Builder for constructing a [`Header`].
#[derive(Debug, Clone)]
pub struct HeaderBuilder {
    header: Header,
}

impl Default for HeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderBuilder {
    /// Creates a builder for the minimal valid header: current version,
    /// Empty flag, timestamp [`MAGIC_DATE`].
    pub fn new() -> Self {
        let mut header = Header {
            version: VERSION,
            timestamp: MAGIC_DATE,
            ..Header::default()
        };
        header.flags.insert(DatumFlag::Empty);
        Self { header }
    }

    /// Sets the format version.
    pub fn version(mut self, version: u16) -> Self {
        self.header.version = version;
        self
    }

    /// Sets the creation timestamp (nanoseconds since Unix epoch).
    pub fn timestamp(mut self, timestamp: u64) -> Self {
        self.header.timestamp = timestamp;
        self
    }

    /// Sets the creation timestamp to now.
    pub fn created_now(mut self) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        self.header.timestamp = nanos;
        self
    }

    /// Sets a flag without touching any field.
    pub fn flag(mut self, flag: DatumFlag) -> Self {
        self.header.flags.insert(flag);
        self
    }

    /// Clears a flag without touching any field.
    pub fn clear_flag(mut self, flag: DatumFlag) -> Self {
        self.header.flags.remove(flag);
        self
    }

    /// Marks the header as a draft.
    pub fn draft(self) -> Self {
        self.flag(DatumFlag::Draft)
    }

    /// Marks the payload as extractable.
    pub fn extractable(self) -> Self {
        self.flag(DatumFlag::Extractable)
    }

    /// Marks the payload as big-endian.
    pub fn big_endian(self) -> Self {
        self.flag(DatumFlag::BigEndian)
    }

    // =========================================================================
    // Flag/field pairs
    // =========================================================================

    /// Sets the operation counter; 0 clears the OPC flag.
    pub fn opc(mut self, opc: u32) -> Self {
        self.header.opc = opc;
        self.header.flags.set(DatumFlag::Opc, opc > 0);
        self
    }

    /// Sets the chunk size in KB; 0 clears the Chunked flag.
    pub fn chunk_size(mut self, chunk_size: u16) -> Self {
        self.header.chunk_size = chunk_size;
        self.header.flags.set(DatumFlag::Chunked, chunk_size > 0);
        self
    }

    /// Sets the source network; 0 clears the Network flag.
    pub fn network_id(mut self, network_id: u32) -> Self {
        self.header.network_id = network_id;
        self.header.flags.set(DatumFlag::Network, network_id > 0);
        self
    }

    /// Sets the payload size; 0 sets the Empty flag.
    pub fn size(mut self, size: u64) -> Self {
        self.header.size = size;
        self.header.flags.set(DatumFlag::Empty, size == 0);
        self
    }

    /// Sets the checksum; 0 clears the Checksum flag.
    pub fn checksum(mut self, checksum: u64) -> Self {
        self.header.checksum = checksum;
        self.header.flags.set(DatumFlag::Checksum, checksum != 0);
        self
    }

    /// Sets the compression algorithm; 0 clears the Compressed flag.
    pub fn compression(mut self, algorithm: u16) -> Self {
        self.header.compression = algorithm;
        self.header.flags.set(DatumFlag::Compressed, algorithm != 0);
        self
    }

    /// Sets the encryption algorithm; 0 clears the Encrypted flag.
    pub fn encryption(mut self, algorithm: u16) -> Self {
        self.header.encryption = algorithm;
        self.header.flags.set(DatumFlag::Encrypted, algorithm != 0);
        self
    }

    /// Sets the signature scheme and length; type 0 clears the Signed flag.
    pub fn signature(mut self, signature_type: u16, signature_size: u16) -> Self {
        self.header.signature_type = signature_type;
        self.header.signature_size = signature_size;
        self.header.flags.set(DatumFlag::Signed, signature_type != 0);
        self
    }

    /// Sets the metadata schema and length; spec 0 clears the Metadata flag.
    pub fn metadata(mut self, metadata_spec: u16, metadata_size: u32) -> Self {
        self.header.metadata_spec = metadata_spec;
        self.header.metadata_size = metadata_size;
        self.header.flags.set(DatumFlag::Metadata, metadata_spec != 0);
        self
    }

    /// Builds the header.
    pub fn build(self) -> Header {
        self.header
    }

    /// Builds and encodes the header, rejecting inconsistent field sets.
    pub fn encode(self) -> Result<[u8; HEADER_SIZE], EncodeError> {
        encode_header(&self.header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::format::MAGIC;

    #[test]
    fn test_default_is_minimal_valid() {
        let header = HeaderBuilder::new().build();
        assert_eq!(header.version, 1);
        assert_eq!(header.timestamp, MAGIC_DATE);
        assert_eq!(header.flags.bits(), DatumFlag::Empty.bits());
        assert_eq!(header.size, 0);

        let bytes = HeaderBuilder::new().encode().unwrap();
        assert_eq!(&bytes[0..4], &MAGIC);
    }

    #[test]
    fn test_size_toggles_empty() {
        let header = HeaderBuilder::new().size(5).build();
        assert!(!header.has_flag(DatumFlag::Empty));

        let header = HeaderBuilder::new().size(5).size(0).build();
        assert!(header.has_flag(DatumFlag::Empty));
    }

    #[test]
    fn test_pairs_set_flags() {
        let header = HeaderBuilder::new()
            .opc(2)
            .chunk_size(3)
            .network_id(4)
            .size(5)
            .checksum(1234567890)
            .compression(6)
            .encryption(7)
            .signature(8, 9)
            .metadata(10, 11)
            .build();

        let expected = DatumFlag::Checksum
            | DatumFlag::Opc
            | DatumFlag::Compressed
            | DatumFlag::Encrypted
            | DatumFlag::Signed
            | DatumFlag::Chunked
            | DatumFlag::Metadata
            | DatumFlag::Network;
        assert_eq!(header.flags, expected);
        assert_eq!(header.flags.bits(), 8 | 16 | 32 | 64 | 256 | 512 | 1024 | 8192);
    }

    #[test]
    fn test_raw_flag_can_break_consistency() {
        let result = HeaderBuilder::new().flag(DatumFlag::Opc).encode();
        assert!(matches!(
            result,
            Err(EncodeError::InvalidHeader(ValidationError::MissingField {
                flag: DatumFlag::Opc,
                ..
            }))
        ));
    }

    #[test]
    fn test_draft_encodes_inconsistent_fields() {
        let draft = HeaderBuilder::new()
            .draft()
            .timestamp(0)
            .flag(DatumFlag::Checksum)
            .clear_flag(DatumFlag::Empty);
        let bytes = draft.clone().encode().unwrap();
        assert_eq!(crate::validate::validate_header(&bytes).unwrap().timestamp, 0);

        let result = draft.clear_flag(DatumFlag::Draft).encode();
        assert!(matches!(
            result,
            Err(EncodeError::InvalidHeader(ValidationError::TimestampBeforeMagicDate { timestamp: 0 }))
        ));
    }

    #[test]
    fn test_created_now_is_after_magic_date() {
        let header = HeaderBuilder::new().created_now().build();
        assert!(header.timestamp > MAGIC_DATE);
    }
}
