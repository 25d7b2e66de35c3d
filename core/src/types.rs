//! types.rs
//! Unified conversion error.

use std::io;

use thiserror::Error;

use crate::compaction::CompactError;
use crate::compression::CompressionError;
use crate::container::ContainerError;
use crate::headers::HeaderError;
use crate::version::VersionMismatch;

/// Error covering every layer of a conversion run.
/// - `From<T>` impls enable `?` across compaction, codec and pipeline code.
/// - Input validation and framing errors are never retried; re-running with
///   the same input fails the same way.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("compaction error: {0}")]
    Compact(#[from] CompactError),

    #[error("header error: {0}")]
    Header(#[from] HeaderError),

    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    #[error("container error: {0}")]
    Container(#[from] ContainerError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Declared version did not match and the policy was `Abort`.
    #[error(transparent)]
    Version(#[from] VersionMismatch),

    #[error("validation error: {0}")]
    Validation(String),
}
