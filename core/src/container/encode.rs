//! container/encode.rs
//!
//! Container encoding.
//!
//! Design notes:
//! - The name is validated before compressing so bad input fails fast.
//! - Metadata is resolved from the compressed length (or taken verbatim) after compression.
//! - Header + payload are concatenated into one buffer; the payload offset is the header length.

use tracing::{debug, info};

use crate::compaction::CompactDocument;
use crate::compression::{gzip, DEFAULT_LEVEL_GZIP};
use crate::container::types::{ContainerError, PackedContainer};
use crate::headers::{encode_header_le, ContainerHeader, MetadataPolicy};

/// Canonical text of a compact document: fixed key order, no whitespace, UTF-8.
pub fn serialize_document(doc: &CompactDocument) -> Result<Vec<u8>, ContainerError> {
    Ok(serde_json::to_vec(doc)?)
}

/// Compress `text` and wrap it in an aligned header named `name`.
pub fn encode_payload(
    text: &[u8],
    name: &str,
    metadata: MetadataPolicy,
    level: u32,
) -> Result<PackedContainer, ContainerError> {
    ContainerHeader::new(name, 0).validate()?;

    let compressed = gzip(text, level)?;
    let value = metadata.resolve(compressed.len())?;
    debug!(?metadata, compressed_len = compressed.len(), value, "resolved metadata value");

    let header = ContainerHeader::new(name, value);
    let mut bytes = encode_header_le(&header)?;
    bytes.reserve(compressed.len());
    bytes.extend_from_slice(&compressed);

    info!(
        name,
        serialized_len = text.len(),
        compressed_len = compressed.len(),
        total_len = bytes.len(),
        "packed container"
    );

    Ok(PackedContainer { header, bytes, serialized_len: text.len() })
}

/// Serialize, compress and frame `doc`.
///
/// `explicit_metadata` overrides the derived `compressed_len - 1` value.
///
/// No version guard runs here: `doc.version` is written as is. Run
/// `version::check_target_version` first, or use `pipeline::package_compact`,
/// which enforces an `ApiConfig::version_policy`.
pub fn encode_container(
    doc: &CompactDocument,
    name: &str,
    explicit_metadata: Option<i64>,
) -> Result<Vec<u8>, ContainerError> {
    let text = serialize_document(doc)?;
    let packed = encode_payload(
        &text,
        name,
        MetadataPolicy::explicit_or_default(explicit_metadata),
        DEFAULT_LEVEL_GZIP,
    )?;
    Ok(packed.into_bytes())
}
