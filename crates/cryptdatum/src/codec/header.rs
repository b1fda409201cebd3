//! Header detection, decoding and encoding.

use std::io::Read;

use crate::codec::layout::Layout;
use crate::error::{DecodeError, EncodeError};
use crate::format::{DELIMITER, DELIMITER_OFFSET, HEADER_SIZE, MAGIC};
use crate::model::Header;
use crate::validate::{validate_fields, validate_header};

// =============================================================================
// DETECTION
// =============================================================================

/// Checks whether `data` starts with something shaped like a header.
///
/// Only the length, the magic prefix and the trailing delimiter are
/// inspected. Use [`has_valid_header`](crate::validate::has_valid_header)
/// or [`decode_header`] before trusting any field.
pub fn has_header(data: &[u8]) -> bool {
    if data.len() < HEADER_SIZE {
        return false;
    }
    data[..MAGIC.len()] == MAGIC && data[DELIMITER_OFFSET..HEADER_SIZE] == DELIMITER
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a header from a reader.
///
/// Performs a single `read` of [`HEADER_SIZE`] bytes; a short read fails with
/// [`DecodeError::UnexpectedEof`] and is not retried. The reader is left
/// positioned after whatever was read and is not closed.
pub fn decode_header<R: Read + ?Sized>(reader: &mut R) -> Result<Header, DecodeError> {
    let mut block = [0u8; HEADER_SIZE];
    let read = reader.read(&mut block)?;
    if read < HEADER_SIZE {
        return Err(DecodeError::UnexpectedEof {
            context: "header",
            read,
        });
    }
    decode_header_bytes(&block)
}

/// Decodes a header from the start of a byte slice.
///
/// Bytes past [`HEADER_SIZE`] (the payload) are ignored.
pub fn decode_header_bytes(data: &[u8]) -> Result<Header, DecodeError> {
    if data.len() < HEADER_SIZE {
        return Err(DecodeError::UnexpectedEof {
            context: "header",
            read: data.len(),
        });
    }
    if !has_header(data) {
        return Err(DecodeError::UnsupportedFormat);
    }
    validate_header(data).map_err(DecodeError::InvalidHeader)
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a header, refusing headers that would not pass validation.
pub fn encode_header(header: &Header) -> Result<[u8; HEADER_SIZE], EncodeError> {
    validate_fields(header).map_err(EncodeError::InvalidHeader)?;
    Ok(encode_header_unchecked(header))
}

/// Encodes a header as-is, consistent or not.
///
/// Headers with a version below the minimum are written with the latest
/// layout. Useful for producing fixtures of malformed data.
pub fn encode_header_unchecked(header: &Header) -> [u8; HEADER_SIZE] {
    Layout::for_version(header.version)
        .unwrap_or(Layout::LATEST)
        .write(header)
}
