//! Data model types for Cryptdatum headers.
//!
//! - Flags (closed flag set and packed bit vector)
//! - Header (decoded record)
//! - Builder (ergonomic construction)

pub mod builder;
pub mod flag;
pub mod header;

pub use builder::HeaderBuilder;
pub use flag::{DatumFlag, DatumFlags};
pub use header::Header;
