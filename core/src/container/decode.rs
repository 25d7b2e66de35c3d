//! container/decode.rs
//!
//! Container decoding: header framing, then optional decompression and parsing.

use crate::compaction::CompactDocument;
use crate::compression::gunzip;
use crate::container::types::{ContainerError, ContainerView};
use crate::headers::{decode_header_le, ContainerHeader};

/// Split `bytes` into header and compressed payload.
pub fn decode_container(bytes: &[u8]) -> Result<ContainerView<'_>, ContainerError> {
    let (header, payload_offset) = decode_header_le(bytes)?;
    Ok(ContainerView { header, payload_offset, payload: &bytes[payload_offset..] })
}

impl ContainerView<'_> {
    /// Decompressed canonical text.
    pub fn decompress(&self) -> Result<Vec<u8>, ContainerError> {
        Ok(gunzip(self.payload)?)
    }

    pub fn document(&self) -> Result<CompactDocument, ContainerError> {
        let text = self.decompress()?;
        let value: serde_json::Value = serde_json::from_slice(&text)?;
        Ok(CompactDocument::from_value(value)?)
    }
}

/// Full inverse of `encode_container`.
pub fn decode_document(bytes: &[u8]) -> Result<(ContainerHeader, CompactDocument), ContainerError> {
    let view = decode_container(bytes)?;
    let doc = view.document()?;
    Ok((view.header, doc))
}
