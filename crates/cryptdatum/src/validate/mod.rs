//! Consistency validation for Cryptdatum headers.
//!
//! A header is checked against an ordered list of rules. Evaluation stops at
//! the first failure, so a header with several defects always reports the
//! same one:
//!
//! 1. presence (magic and delimiter)
//! 2. version
//! 3. Compromised flag (always invalid)
//! 4. Draft flag (valid, remaining rules skipped)
//! 5. timestamp not older than [`MAGIC_DATE`]
//! 6. OPC / operation counter
//! 7. Chunked / chunk size
//! 8. Network / network id
//! 9. Empty / size
//! 10. Checksum / checksum
//! 11. Compressed requires a compression algorithm
//! 12. Encrypted requires an encryption algorithm
//! 13. Signed / signature type, then signature size
//! 14. Metadata / metadata spec, then metadata size
//!
//! Compression and encryption are only checked one way: an algorithm id
//! without its flag is accepted. All other pairs must agree both ways.

use crate::codec::has_header;
use crate::codec::layout::{Field, Layout, VERSION_OFFSET};
use crate::error::ValidationError;
use crate::format::{HEADER_SIZE, MAGIC_DATE, MIN_VERSION};
use crate::model::{DatumFlag, Header};

/// Outcome of a rule that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Rule passed; evaluate the next one.
    Continue,
    /// Header accepted; skip the remaining rules.
    Accept,
}

type Rule = fn(&Header) -> Result<Step, ValidationError>;

/// Field rules in evaluation order.
const RULES: [Rule; 13] = [
    check_version,
    check_compromised,
    check_draft,
    check_timestamp,
    check_opc,
    check_chunked,
    check_network,
    check_size,
    check_checksum,
    check_compression,
    check_encryption,
    check_signature,
    check_metadata,
];

/// Checks whether `data` starts with a valid header.
pub fn has_valid_header(data: &[u8]) -> bool {
    validate_header(data).is_ok()
}

/// Validates the header at the start of `data`, returning it on success.
///
/// The error names the first rule the header violates.
pub fn validate_header(data: &[u8]) -> Result<Header, ValidationError> {
    if !has_header(data) {
        return Err(ValidationError::MissingHeader);
    }

    let version = u16::from_le_bytes([data[VERSION_OFFSET], data[VERSION_OFFSET + 1]]);
    let layout = Layout::for_version(version).ok_or(ValidationError::UnsupportedVersion { version })?;
    let header = layout
        .read(&data[..HEADER_SIZE])
        .map_err(|_| ValidationError::MissingHeader)?;

    validate_fields(&header)?;
    Ok(header)
}

/// Runs the field rules against an in-memory header.
pub fn validate_fields(header: &Header) -> Result<(), ValidationError> {
    for rule in RULES {
        if rule(header)? == Step::Accept {
            break;
        }
    }
    Ok(())
}

// =============================================================================
// RULES
// =============================================================================

fn check_version(header: &Header) -> Result<Step, ValidationError> {
    if header.version < MIN_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: header.version,
        });
    }
    Ok(Step::Continue)
}

fn check_compromised(header: &Header) -> Result<Step, ValidationError> {
    if header.has_flag(DatumFlag::Compromised) {
        return Err(ValidationError::Compromised);
    }
    Ok(Step::Continue)
}

fn check_draft(header: &Header) -> Result<Step, ValidationError> {
    if header.has_flag(DatumFlag::Draft) {
        return Ok(Step::Accept);
    }
    Ok(Step::Continue)
}

fn check_timestamp(header: &Header) -> Result<Step, ValidationError> {
    if header.timestamp < MAGIC_DATE {
        return Err(ValidationError::TimestampBeforeMagicDate {
            timestamp: header.timestamp,
        });
    }
    Ok(Step::Continue)
}

fn check_opc(header: &Header) -> Result<Step, ValidationError> {
    paired(header, DatumFlag::Opc, Field::Opc, header.opc > 0)
}

fn check_chunked(header: &Header) -> Result<Step, ValidationError> {
    paired(header, DatumFlag::Chunked, Field::ChunkSize, header.chunk_size > 0)
}

fn check_network(header: &Header) -> Result<Step, ValidationError> {
    paired(header, DatumFlag::Network, Field::NetworkId, header.network_id >= 1)
}

fn check_size(header: &Header) -> Result<Step, ValidationError> {
    match (header.has_flag(DatumFlag::Empty), header.size) {
        (true, size) if size > 0 => Err(ValidationError::EmptyWithSize { size }),
        (false, 0) => Err(ValidationError::MissingSize),
        _ => Ok(Step::Continue),
    }
}

fn check_checksum(header: &Header) -> Result<Step, ValidationError> {
    paired(header, DatumFlag::Checksum, Field::Checksum, header.checksum != 0)
}

fn check_compression(header: &Header) -> Result<Step, ValidationError> {
    required(header, DatumFlag::Compressed, Field::Compression, header.compression != 0)
}

fn check_encryption(header: &Header) -> Result<Step, ValidationError> {
    required(header, DatumFlag::Encrypted, Field::Encryption, header.encryption != 0)
}

fn check_signature(header: &Header) -> Result<Step, ValidationError> {
    required(header, DatumFlag::Signed, Field::SignatureType, header.signature_type != 0)?;
    forbidden(header, DatumFlag::Signed, Field::SignatureType, header.signature_type != 0)?;
    forbidden(header, DatumFlag::Signed, Field::SignatureSize, header.signature_size != 0)
}

fn check_metadata(header: &Header) -> Result<Step, ValidationError> {
    required(header, DatumFlag::Metadata, Field::MetadataSpec, header.metadata_spec != 0)?;
    forbidden(header, DatumFlag::Metadata, Field::MetadataSpec, header.metadata_spec != 0)?;
    forbidden(header, DatumFlag::Metadata, Field::MetadataSize, header.metadata_size != 0)
}

/// Flag set requires the field.
fn required(header: &Header, flag: DatumFlag, field: Field, present: bool) -> Result<Step, ValidationError> {
    if header.has_flag(flag) && !present {
        return Err(ValidationError::MissingField { flag, field });
    }
    Ok(Step::Continue)
}

/// Flag clear forbids the field.
fn forbidden(header: &Header, flag: DatumFlag, field: Field, present: bool) -> Result<Step, ValidationError> {
    if !header.has_flag(flag) && present {
        return Err(ValidationError::UnexpectedField { flag, field });
    }
    Ok(Step::Continue)
}

fn paired(header: &Header, flag: DatumFlag, field: Field, present: bool) -> Result<Step, ValidationError> {
    required(header, flag, field, present)?;
    forbidden(header, flag, field, present)
}
