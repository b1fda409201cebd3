//! Datum feature flags.
//!
//! Each flag is one bit of the 64-bit `flags` header field. [`DatumFlag`] is
//! the closed set of defined bits; [`DatumFlags`] is the packed bit vector as
//! it appears on the wire.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A single defined feature flag.
#[repr(u64)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatumFlag {
    /// Datum is marked invalid by its producer.
    Invalid = 1 << 0,
    /// Header is provisional; consistency checks are skipped.
    Draft = 1 << 1,
    /// Datum carries no payload (`size == 0`).
    Empty = 1 << 2,
    /// `checksum` field is set.
    Checksum = 1 << 3,
    /// `opc` operation counter is set.
    Opc = 1 << 4,
    /// Payload is compressed with the `compression` algorithm.
    Compressed = 1 << 5,
    /// Payload is encrypted with the `encryption` algorithm.
    Encrypted = 1 << 6,
    /// Payload may be extracted from the datum.
    Extractable = 1 << 7,
    /// Datum is signed; `signature_type` is set.
    Signed = 1 << 8,
    /// Payload is split into `chunk_size` KB chunks.
    Chunked = 1 << 9,
    /// Datum carries a metadata block described by `metadata_spec`.
    Metadata = 1 << 10,
    /// Datum is compromised and must not be trusted.
    Compromised = 1 << 11,
    /// Payload uses big-endian byte order.
    BigEndian = 1 << 12,
    /// `network_id` identifies the source network.
    Network = 1 << 13,
}

impl DatumFlag {
    /// All defined flags in bit order.
    pub const ALL: [DatumFlag; 14] = [
        DatumFlag::Invalid,
        DatumFlag::Draft,
        DatumFlag::Empty,
        DatumFlag::Checksum,
        DatumFlag::Opc,
        DatumFlag::Compressed,
        DatumFlag::Encrypted,
        DatumFlag::Extractable,
        DatumFlag::Signed,
        DatumFlag::Chunked,
        DatumFlag::Metadata,
        DatumFlag::Compromised,
        DatumFlag::BigEndian,
        DatumFlag::Network,
    ];

    /// Returns the bit value of this flag.
    #[inline]
    pub const fn bits(self) -> u64 {
        self as u64
    }

    /// Returns the flag for a single-bit value, if defined.
    pub fn from_bits(bits: u64) -> Option<Self> {
        DatumFlag::ALL.into_iter().find(|flag| flag.bits() == bits)
    }

    /// Returns the display name (e.g. "DATUM CHECKSUM").
    pub fn name(self) -> &'static str {
        match self {
            DatumFlag::Invalid => "DATUM INVALID",
            DatumFlag::Draft => "DATUM DRAFT",
            DatumFlag::Empty => "DATUM EMPTY",
            DatumFlag::Checksum => "DATUM CHECKSUM",
            DatumFlag::Opc => "DATUM OPC",
            DatumFlag::Compressed => "DATUM COMPRESSED",
            DatumFlag::Encrypted => "DATUM ENCRYPTED",
            DatumFlag::Extractable => "DATUM EXTRACTABLE",
            DatumFlag::Signed => "DATUM SIGNED",
            DatumFlag::Chunked => "DATUM CHUNKED",
            DatumFlag::Metadata => "DATUM METADATA",
            DatumFlag::Compromised => "DATUM COMPROMISED",
            DatumFlag::BigEndian => "DATUM BIG ENDIAN",
            DatumFlag::Network => "DATUM NETWORK",
        }
    }
}

impl fmt::Display for DatumFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl BitOr for DatumFlag {
    type Output = DatumFlags;

    fn bitor(self, rhs: DatumFlag) -> DatumFlags {
        DatumFlags::from(self) | rhs
    }
}

/// Packed flag vector as stored in the header.
///
/// Bits outside the defined set are preserved so a decoded header encodes
/// back to identical bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DatumFlags(u64);

impl DatumFlags {
    /// No flags set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Wraps a raw flags field.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Returns the raw flags field.
    pub const fn bits(&self) -> u64 {
        self.0
    }

    /// Returns true if `flag` is set.
    #[inline]
    pub const fn contains(&self, flag: DatumFlag) -> bool {
        self.0 & flag.bits() != 0
    }

    /// Returns true if no bits are set.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Sets `flag`.
    pub fn insert(&mut self, flag: DatumFlag) {
        self.0 |= flag.bits();
    }

    /// Clears `flag`.
    pub fn remove(&mut self, flag: DatumFlag) {
        self.0 &= !flag.bits();
    }

    /// Sets or clears `flag`.
    pub fn set(&mut self, flag: DatumFlag, on: bool) {
        if on {
            self.insert(flag);
        } else {
            self.remove(flag);
        }
    }

    /// Returns bits that do not correspond to a defined flag.
    pub fn unknown_bits(&self) -> u64 {
        let known = DatumFlag::ALL.iter().fold(0u64, |acc, f| acc | f.bits());
        self.0 & !known
    }

    /// Iterates over the defined flags that are set, in bit order.
    pub fn iter(&self) -> impl Iterator<Item = DatumFlag> + '_ {
        DatumFlag::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl From<DatumFlag> for DatumFlags {
    fn from(flag: DatumFlag) -> Self {
        Self(flag.bits())
    }
}

impl FromIterator<DatumFlag> for DatumFlags {
    fn from_iter<I: IntoIterator<Item = DatumFlag>>(iter: I) -> Self {
        let mut flags = DatumFlags::empty();
        for flag in iter {
            flags.insert(flag);
        }
        flags
    }
}

impl BitOr<DatumFlag> for DatumFlags {
    type Output = DatumFlags;

    fn bitor(mut self, rhs: DatumFlag) -> DatumFlags {
        self.insert(rhs);
        self
    }
}

impl BitOr for DatumFlags {
    type Output = DatumFlags;

    fn bitor(self, rhs: DatumFlags) -> DatumFlags {
        DatumFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign<DatumFlag> for DatumFlags {
    fn bitor_assign(&mut self, rhs: DatumFlag) {
        self.insert(rhs);
    }
}

impl fmt::Debug for DatumFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_set();
        list.entries(self.iter());
        let unknown = self.unknown_bits();
        if unknown != 0 {
            list.entry(&format_args!("{:#x}", unknown));
        }
        list.finish()
    }
}
