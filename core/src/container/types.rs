//! container/types.rs
//! Packed container values and codec errors.

use thiserror::Error;

use crate::compaction::CompactError;
use crate::compression::CompressionError;
use crate::headers::{ContainerHeader, HeaderError};

/// Result of packing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedContainer {
    pub header: ContainerHeader,
    /// Header bytes followed by the gzip member.
    pub bytes: Vec<u8>,
    /// Length of the uncompressed canonical text.
    pub serialized_len: usize,
}

impl PackedContainer {
    pub fn header_len(&self) -> usize {
        self.header.len()
    }

    pub fn payload(&self) -> &[u8] {
        &self.bytes[self.header_len()..]
    }

    pub fn payload_len(&self) -> usize {
        self.bytes.len() - self.header_len()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Borrowed view of a decoded container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerView<'a> {
    pub header: ContainerHeader,
    pub payload_offset: usize,
    /// Compressed member, everything after the header.
    pub payload: &'a [u8],
}

impl<'a> ContainerView<'a> {
    /// `(name, metadata, compressed payload)`.
    pub fn into_parts(self) -> (String, u16, &'a [u8]) {
        (self.header.name, self.header.metadata, self.payload)
    }
}

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("header error: {0}")]
    Header(#[from] HeaderError),

    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    #[error("document error: {0}")]
    Document(#[from] CompactError),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
