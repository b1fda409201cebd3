//! Cryptdatum: a self-describing 64-byte header for arbitrary payloads.
//!
//! This crate provides detection, validation, decoding and encoding of
//! Cryptdatum v1 headers.
//!
//! # Overview
//!
//! Every datum starts with a fixed header that announces which features the
//! payload uses (compression, encryption, signature, chunking, metadata...).
//! Consumers go through three steps, cheapest first:
//! - **Detect**: [`has_header`] checks magic and delimiter only
//! - **Validate**: [`has_valid_header`] checks every flag against its field
//! - **Decode**: [`decode_header`] reads 64 bytes and returns a [`Header`]
//!
//! # Quick Start
//!
//! ```rust
//! use cryptdatum::{decode_header, encode_header, has_valid_header, DatumFlag, HeaderBuilder};
//!
//! let header = HeaderBuilder::new()
//!     .size(5)
//!     .checksum(1234567890)
//!     .signature(8, 9)
//!     .build();
//!
//! let bytes = encode_header(&header).unwrap();
//! assert!(has_valid_header(&bytes));
//!
//! let decoded = decode_header(&mut &bytes[..]).unwrap();
//! assert_eq!(decoded, header);
//! assert!(decoded.has_flag(DatumFlag::Signed));
//! ```
//!
//! # Modules
//!
//! - [`model`]: Header record, flags and builder
//! - [`codec`]: Presence check, decoding and encoding
//! - [`validate`]: Ordered consistency rules
//! - [`format`]: Format constants
//! - [`util`]: Timestamp conversions
//! - [`error`]: Error types
//!
//! # Wire Format
//!
//! 64 bytes, little-endian: magic `A7 F6 E5 D4`, version, flags, timestamp,
//! operation counter, chunk size, network id, size, checksum, compression,
//! encryption, signature type and size, metadata spec and size, then the
//! delimiter `A6 E5`.

pub mod codec;
pub mod error;
pub mod format;
pub mod model;
pub mod util;
pub mod validate;

// Re-export commonly used types at crate root
pub use codec::{
    decode_header, decode_header_bytes, encode_header, encode_header_unchecked, has_header, Field,
    Layout,
};
pub use error::{DecodeError, EncodeError, ErrorKind, ValidationError};
pub use format::{DELIMITER, HEADER_SIZE, MAGIC, MAGIC_DATE, MIN_VERSION, VERSION};
pub use model::{DatumFlag, DatumFlags, Header, HeaderBuilder};
pub use util::{format_timestamp_rfc3339, parse_timestamp_rfc3339, to_time};
pub use validate::{has_valid_header, validate_fields, validate_header};

/// Crate version.
pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");
