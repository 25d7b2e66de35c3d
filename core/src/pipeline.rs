//! pipeline.rs
//! Caller-facing API: expanded JSON -> compact document -> container, and back.
//!
//! Design notes:
//! - Every entry point is a synchronous, in-memory transform; the caller owns file I/O.
//! - Version checks run before compaction (source generation) and before
//!   packing (target generation); `ApiConfig::version_policy` decides on mismatch.
//! - Each call returns the produced value together with a `ConversionSnapshot`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::compaction::{compact_document, CompactDocument, ExpandedDocument};
use crate::compression::{CompressionError, DEFAULT_LEVEL_GZIP};
use crate::constants::{MAX_COMPRESSION_LEVEL, UNKNOWN_VERSION, VERSION_FIELD};
use crate::container::{decode_container, encode_payload, serialize_document, PackedContainer};
use crate::headers::{ContainerHeader, HeaderError, MetadataPolicy};
use crate::telemetry::{ConversionCounters, ConversionSnapshot, Stage, TelemetryTimer};
use crate::types::ConvertError;
use crate::version::{check_source_version, check_target_version, VersionPolicy};

fn default_level() -> u32 {
    DEFAULT_LEVEL_GZIP
}

/// Container packing parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackParams {
    /// ASCII name written into the header (e.g. `Expert.beatmap.gz`).
    pub container_name: String,
    #[serde(default)]
    pub metadata: MetadataPolicy,
    #[serde(default = "default_level")]
    pub level: u32,
}

impl PackParams {
    pub fn new(container_name: impl Into<String>) -> Self {
        Self {
            container_name: container_name.into(),
            metadata: MetadataPolicy::default(),
            level: DEFAULT_LEVEL_GZIP,
        }
    }

    pub fn with_metadata(mut self, metadata: MetadataPolicy) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_explicit_metadata(self, value: i64) -> Self {
        self.with_metadata(MetadataPolicy::Explicit(value))
    }

    /// Name the container after `path`'s file name.
    pub fn for_output_path(path: &Path) -> Result<Self, ConvertError> {
        Ok(Self::new(container_name_from_path(path)?))
    }

    pub fn validate(&self) -> Result<(), ConvertError> {
        ContainerHeader::new(self.container_name.as_str(), 0).validate()?;
        if self.level > MAX_COMPRESSION_LEVEL {
            return Err(CompressionError::InvalidLevel { have: self.level, max: MAX_COMPRESSION_LEVEL }.into());
        }
        if let MetadataPolicy::Explicit(value) = self.metadata {
            if u16::try_from(value).is_err() {
                return Err(HeaderError::MetadataOutOfRange { value }.into());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Applied when a document declares an unexpected generation.
    #[serde(default)]
    pub version_policy: VersionPolicy,
}

impl ApiConfig {
    pub fn new(version_policy: VersionPolicy) -> Self {
        Self { version_policy }
    }

    pub fn proceed_on_mismatch() -> Self {
        Self::new(VersionPolicy::Proceed)
    }
}

/// Produced value plus telemetry.
#[derive(Debug, Clone)]
pub struct ConversionOutput<T> {
    pub output: T,
    pub snapshot: ConversionSnapshot,
}

/// Header name derived from an output path (`out/Expert.beatmap.gz` -> `Expert.beatmap.gz`).
pub fn container_name_from_path(path: &Path) -> Result<String, ConvertError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| ConvertError::Validation(format!("no usable file name in {}", path.display())))
}

fn compact_checked(
    input: &ExpandedDocument,
    config: &ApiConfig,
    counters: &mut ConversionCounters,
    timer: &mut TelemetryTimer,
) -> Result<CompactDocument, ConvertError> {
    check_source_version(input.version()).enforce(config.version_policy)?;
    let doc = timer.measure(Stage::Compact, || compact_document(input))?;
    counters.add_document(&doc);
    Ok(doc)
}

fn pack(
    text: &[u8],
    params: &PackParams,
    counters: &mut ConversionCounters,
    timer: &mut TelemetryTimer,
) -> Result<PackedContainer, ConvertError> {
    let packed = timer.measure(Stage::Compress, || {
        encode_payload(text, &params.container_name, params.metadata, params.level)
    })?;
    counters.add_container(packed.header_len(), packed.payload_len());
    Ok(packed)
}

fn parse_json(input: &[u8], counters: &mut ConversionCounters, timer: &mut TelemetryTimer) -> Result<Value, ConvertError> {
    counters.add_input(input.len());
    Ok(timer.measure(Stage::Parse, || serde_json::from_slice::<Value>(input))?)
}

/// Compact an already-parsed expanded document.
pub fn convert_document(
    input: &ExpandedDocument,
    config: &ApiConfig,
) -> Result<ConversionOutput<CompactDocument>, ConvertError> {
    let mut counters = ConversionCounters::default();
    let mut timer = TelemetryTimer::new();

    let doc = compact_checked(input, config, &mut counters, &mut timer)?;

    timer.finish();
    Ok(ConversionOutput { output: doc, snapshot: ConversionSnapshot::from(&counters, &timer, None) })
}

/// Expanded JSON text -> canonical compact JSON text.
pub fn convert_json(input: &[u8], config: &ApiConfig) -> Result<ConversionOutput<Vec<u8>>, ConvertError> {
    let mut counters = ConversionCounters::default();
    let mut timer = TelemetryTimer::new();

    let value = parse_json(input, &mut counters, &mut timer)?;
    let expanded = ExpandedDocument::from_value(value)?;
    let doc = compact_checked(&expanded, config, &mut counters, &mut timer)?;
    let text = timer.measure(Stage::Serialize, || serialize_document(&doc))?;
    counters.add_serialized(text.len());

    timer.finish();
    let snapshot = ConversionSnapshot::from(&counters, &timer, None);
    info!(
        input_bytes = snapshot.bytes_input,
        output_bytes = snapshot.bytes_serialized,
        reduction_percent = snapshot.size_reduction_percent,
        "converted expanded document"
    );
    Ok(ConversionOutput { output: text, snapshot })
}

/// Pack a compact document into a container.
pub fn package_compact(
    doc: &CompactDocument,
    params: &PackParams,
    config: &ApiConfig,
) -> Result<ConversionOutput<Vec<u8>>, ConvertError> {
    params.validate()?;
    check_target_version(&doc.version).enforce(config.version_policy)?;

    let mut counters = ConversionCounters::default();
    let mut timer = TelemetryTimer::new();
    counters.add_document(doc);

    let text = timer.measure(Stage::Serialize, || serialize_document(doc))?;
    counters.add_serialized(text.len());
    let packed = pack(&text, params, &mut counters, &mut timer)?;

    timer.finish();
    let snapshot = ConversionSnapshot::from(&counters, &timer, Some(packed.header.metadata));
    Ok(ConversionOutput { output: packed.into_bytes(), snapshot })
}

/// Expanded JSON text -> container, in one run.
pub fn package_json(
    input: &[u8],
    params: &PackParams,
    config: &ApiConfig,
) -> Result<ConversionOutput<Vec<u8>>, ConvertError> {
    params.validate()?;

    let mut counters = ConversionCounters::default();
    let mut timer = TelemetryTimer::new();

    let value = parse_json(input, &mut counters, &mut timer)?;
    let expanded = ExpandedDocument::from_value(value)?;
    let doc = compact_checked(&expanded, config, &mut counters, &mut timer)?;
    let text = timer.measure(Stage::Serialize, || serialize_document(&doc))?;
    counters.add_serialized(text.len());
    let packed = pack(&text, params, &mut counters, &mut timer)?;

    timer.finish();
    let snapshot = ConversionSnapshot::from(&counters, &timer, Some(packed.header.metadata));
    Ok(ConversionOutput { output: packed.into_bytes(), snapshot })
}

/// Re-pack an existing compact JSON document of any shape.
///
/// Unknown top-level keys are kept in their original order; only whitespace
/// is normalized.
pub fn recompress_json(
    input: &[u8],
    params: &PackParams,
    config: &ApiConfig,
) -> Result<ConversionOutput<Vec<u8>>, ConvertError> {
    params.validate()?;

    let mut counters = ConversionCounters::default();
    let mut timer = TelemetryTimer::new();

    let value = parse_json(input, &mut counters, &mut timer)?;
    let version = value.get(VERSION_FIELD).and_then(Value::as_str).unwrap_or(UNKNOWN_VERSION);
    check_target_version(version).enforce(config.version_policy)?;

    let text = timer.measure(Stage::Serialize, || serde_json::to_vec(&value))?;
    counters.add_serialized(text.len());
    let packed = pack(&text, params, &mut counters, &mut timer)?;

    timer.finish();
    let snapshot = ConversionSnapshot::from(&counters, &timer, Some(packed.header.metadata));
    Ok(ConversionOutput { output: packed.into_bytes(), snapshot })
}

/// Decode a container back to its header and a validated compact document.
pub fn unpack_container(bytes: &[u8]) -> Result<ConversionOutput<(ContainerHeader, CompactDocument)>, ConvertError> {
    let mut counters = ConversionCounters::default();
    let mut timer = TelemetryTimer::new();

    let view = timer.measure(Stage::Decode, || decode_container(bytes))?;
    counters.add_container(view.payload_offset, view.payload.len());
    let text = timer.measure(Stage::Decompress, || view.decompress())?;
    counters.add_serialized(text.len());
    let value = timer.measure(Stage::Parse, || serde_json::from_slice::<Value>(&text))?;
    let doc = CompactDocument::from_value(value)?;
    doc.validate()?;
    counters.add_document(&doc);

    timer.finish();
    let snapshot = ConversionSnapshot::from(&counters, &timer, Some(view.header.metadata));
    Ok(ConversionOutput { output: (view.header, doc), snapshot })
}
