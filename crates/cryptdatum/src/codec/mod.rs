//! Binary encoding/decoding for Cryptdatum headers.
//!
//! Implements the fixed 64-byte header block and its per-version layouts.

pub mod header;
pub mod layout;
pub mod primitives;

pub use header::{
    decode_header, decode_header_bytes, encode_header, encode_header_unchecked, has_header,
};
pub use layout::{Field, Layout};
pub use primitives::{Reader, Writer};
