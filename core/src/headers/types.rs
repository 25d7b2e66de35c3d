//! headers/types.rs
//! Container header struct, layout view, metadata policy and header errors.
//!
//! Wire layout (all integers little-endian):
//!
//! ```text
//! 0..4            name length N (u32)
//! 4..4+N          name (ASCII)
//! 4+N             0x00 terminator
//! 5+N..5+N+P      P zero padding bytes
//! 5+N+P..11+N+P   metadata block: u16 0, u16 value, u16 0
//! 11+N+P..        gzip member (offset % 4 == 0)
//! ```
//!
//! P is the smallest value making the header length a multiple of 4.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_METADATA_OFFSET, METADATA_BLOCK_LEN, NAME_LEN_PREFIX, NAME_TERMINATOR_LEN,
};
use crate::utils::{fmt_bytes, header_len, header_padding};

/// Parsed or to-be-written container header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub name: String,
    /// Middle `u16` of the metadata block.
    pub metadata: u16,
    /// First and last `u16` of the metadata block; zero when written.
    pub reserved: [u16; 2],
}

impl ContainerHeader {
    pub fn new(name: impl Into<String>, metadata: u16) -> Self {
        Self { name: name.into(), metadata, reserved: [0; 2] }
    }

    #[inline]
    pub fn name_len(&self) -> usize {
        self.name.len()
    }

    #[inline]
    pub fn padding(&self) -> usize {
        header_padding(self.name_len())
    }

    /// Encoded header length; also the payload offset.
    #[inline]
    pub fn len(&self) -> usize {
        header_len(self.name_len())
    }

    pub fn layout(&self) -> HeaderLayout {
        HeaderLayout::for_name_len(self.name_len())
    }

    pub fn validate(&self) -> Result<(), HeaderError> {
        if !self.name.is_ascii() {
            return Err(HeaderError::NonAsciiName { name: fmt_bytes(self.name.as_bytes()) });
        }
        if u32::try_from(self.name_len()).is_err() {
            return Err(HeaderError::NameTooLong { have: self.name_len() });
        }
        if self.reserved != [0; 2] {
            return Err(HeaderError::ReservedNonZero { reserved: self.reserved });
        }
        Ok(())
    }
}

/// Byte offsets of each header region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLayout {
    pub name: Range<usize>,
    pub terminator: usize,
    pub padding: Range<usize>,
    pub metadata: Range<usize>,
    pub payload_offset: usize,
}

impl HeaderLayout {
    pub fn for_name_len(name_len: usize) -> Self {
        let name = NAME_LEN_PREFIX..NAME_LEN_PREFIX + name_len;
        let terminator = name.end;
        let padding = terminator + NAME_TERMINATOR_LEN..terminator + NAME_TERMINATOR_LEN + header_padding(name_len);
        let metadata = padding.end..padding.end + METADATA_BLOCK_LEN;
        let payload_offset = metadata.end;
        debug_assert_eq!(payload_offset, header_len(name_len));
        Self { name, terminator, padding, metadata, payload_offset }
    }
}

/// How the metadata value is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetadataPolicy {
    /// Caller-supplied value; must fit in `u16`.
    Explicit(i64),
    /// `compressed_len - offset`. Heuristic observed on shipped containers.
    Derived { offset: i64 },
}

impl Default for MetadataPolicy {
    fn default() -> Self {
        MetadataPolicy::Derived { offset: DEFAULT_METADATA_OFFSET }
    }
}

impl MetadataPolicy {
    pub fn explicit_or_default(value: Option<i64>) -> Self {
        value.map(MetadataPolicy::Explicit).unwrap_or_default()
    }

    /// Metadata value for a payload of `compressed_len` bytes.
    pub fn resolve(&self, compressed_len: usize) -> Result<u16, HeaderError> {
        let value = match *self {
            MetadataPolicy::Explicit(v) => v,
            MetadataPolicy::Derived { offset } => {
                let len = i64::try_from(compressed_len)
                    .map_err(|_| HeaderError::MetadataOutOfRange { value: i64::MAX })?;
                len.saturating_sub(offset)
            }
        };
        u16::try_from(value).map_err(|_| HeaderError::MetadataOutOfRange { value })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    /// Buffer shorter than the header it announces.
    #[error("header buffer too short: {have} < {need}")]
    BufferTooShort { have: usize, need: usize },

    /// Container name must be one byte per character.
    #[error("container name must be ASCII, got {name}")]
    NonAsciiName { name: String },

    #[error("container name too long: {have} bytes")]
    NameTooLong { have: usize },

    #[error("metadata value {value} does not fit in u16")]
    MetadataOutOfRange { value: i64 },

    /// Byte after the name is not `0x00`.
    #[error("name terminator must be 0x00, got 0x{found:02x}")]
    NonZeroTerminator { found: u8 },

    #[error("reserved metadata words must be zero, got {reserved:?}")]
    ReservedNonZero { reserved: [u16; 2] },

    /// Internal defect: the padding computation produced a misaligned header.
    #[error("header length {len} is not 4-byte aligned")]
    Misaligned { len: usize },
}
