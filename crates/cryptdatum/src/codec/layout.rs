//! Field layouts per format version.
//!
//! The version field always sits at bytes 4..6, right after the magic. Its
//! value selects a [`Layout`] that knows where every other field lives.
//! Only v1 exists today; newer version numbers are read with the latest
//! known layout.

use std::fmt;

use crate::codec::primitives::{Reader, Writer};
use crate::error::DecodeError;
use crate::format::{DELIMITER, HEADER_SIZE, MAGIC, MIN_VERSION};
use crate::model::{DatumFlags, Header};

/// Offset of the version field, shared by all layouts.
pub const VERSION_OFFSET: usize = MAGIC.len();

/// A header field on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Magic,
    Version,
    Flags,
    Timestamp,
    Opc,
    ChunkSize,
    NetworkId,
    Size,
    Checksum,
    Compression,
    Encryption,
    SignatureType,
    SignatureSize,
    MetadataSpec,
    MetadataSize,
    Delimiter,
}

impl Field {
    /// All fields in wire order.
    pub const ALL: [Field; 16] = [
        Field::Magic,
        Field::Version,
        Field::Flags,
        Field::Timestamp,
        Field::Opc,
        Field::ChunkSize,
        Field::NetworkId,
        Field::Size,
        Field::Checksum,
        Field::Compression,
        Field::Encryption,
        Field::SignatureType,
        Field::SignatureSize,
        Field::MetadataSpec,
        Field::MetadataSize,
        Field::Delimiter,
    ];

    /// Returns a human-readable field name.
    pub fn name(self) -> &'static str {
        match self {
            Field::Magic => "magic",
            Field::Version => "version",
            Field::Flags => "flags",
            Field::Timestamp => "timestamp",
            Field::Opc => "operation counter",
            Field::ChunkSize => "chunk size",
            Field::NetworkId => "network id",
            Field::Size => "size",
            Field::Checksum => "checksum",
            Field::Compression => "compression algorithm",
            Field::Encryption => "encryption algorithm",
            Field::SignatureType => "signature type",
            Field::SignatureSize => "signature size",
            Field::MetadataSpec => "metadata spec",
            Field::MetadataSize => "metadata size",
            Field::Delimiter => "delimiter",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Header layout, selected by the version field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    V1,
}

impl Layout {
    /// Layout used when writing new headers.
    pub const LATEST: Layout = Layout::V1;

    /// Selects the layout for a version, or `None` below [`MIN_VERSION`].
    pub fn for_version(version: u16) -> Option<Self> {
        if version < MIN_VERSION {
            return None;
        }
        Some(Layout::LATEST)
    }

    /// Returns `(offset, width)` of a field in bytes.
    pub const fn span(self, field: Field) -> (usize, usize) {
        match self {
            Layout::V1 => match field {
                Field::Magic => (0, 4),
                Field::Version => (VERSION_OFFSET, 2),
                Field::Flags => (6, 8),
                Field::Timestamp => (14, 8),
                Field::Opc => (22, 4),
                Field::ChunkSize => (26, 2),
                Field::NetworkId => (28, 4),
                Field::Size => (32, 8),
                Field::Checksum => (40, 8),
                Field::Compression => (48, 2),
                Field::Encryption => (50, 2),
                Field::SignatureType => (52, 2),
                Field::SignatureSize => (54, 2),
                Field::MetadataSpec => (56, 2),
                Field::MetadataSize => (58, 4),
                Field::Delimiter => (62, 2),
            },
        }
    }

    /// Extracts every field from a header block.
    ///
    /// Magic, delimiter and field consistency are not checked here.
    pub fn read(self, data: &[u8]) -> Result<Header, DecodeError> {
        let mut reader = Reader::new(data);
        match self {
            Layout::V1 => read_v1(&mut reader),
        }
    }

    /// Serializes a header into a block, including magic and delimiter.
    pub fn write(self, header: &Header) -> [u8; HEADER_SIZE] {
        let mut writer = Writer::new();
        match self {
            Layout::V1 => write_v1(&mut writer, header),
        }
        writer.into_block()
    }
}

fn read_v1(reader: &mut Reader<'_>) -> Result<Header, DecodeError> {
    reader.read_bytes(MAGIC.len(), "magic")?;
    let version = reader.read_u16("version")?;
    let flags = DatumFlags::from_bits(reader.read_u64("flags")?);
    let timestamp = reader.read_u64("timestamp")?;
    let opc = reader.read_u32("opc")?;
    let chunk_size = reader.read_u16("chunk_size")?;
    let network_id = reader.read_u32("network_id")?;
    let size = reader.read_u64("size")?;
    let checksum = reader.read_u64("checksum")?;
    let compression = reader.read_u16("compression")?;
    let encryption = reader.read_u16("encryption")?;
    let signature_type = reader.read_u16("signature_type")?;
    let signature_size = reader.read_u16("signature_size")?;
    let metadata_spec = reader.read_u16("metadata_spec")?;
    let metadata_size = reader.read_u32("metadata_size")?;
    reader.read_bytes(DELIMITER.len(), "delimiter")?;

    Ok(Header {
        version,
        flags,
        timestamp,
        opc,
        chunk_size,
        network_id,
        size,
        checksum,
        compression,
        encryption,
        signature_type,
        signature_size,
        metadata_spec,
        metadata_size,
    })
}

fn write_v1(writer: &mut Writer, header: &Header) {
    writer.write_bytes(&MAGIC);
    writer.write_u16(header.version);
    writer.write_u64(header.flags.bits());
    writer.write_u64(header.timestamp);
    writer.write_u32(header.opc);
    writer.write_u16(header.chunk_size);
    writer.write_u32(header.network_id);
    writer.write_u64(header.size);
    writer.write_u64(header.checksum);
    writer.write_u16(header.compression);
    writer.write_u16(header.encryption);
    writer.write_u16(header.signature_type);
    writer.write_u16(header.signature_size);
    writer.write_u16(header.metadata_spec);
    writer.write_u32(header.metadata_size);
    writer.write_bytes(&DELIMITER);
}
