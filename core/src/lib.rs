//! beatmap-core
//!
//! Beatmap compaction and aligned container packing.
//! Pure, synchronous, in-memory transforms; no file or process I/O.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod version;

// Feature modules
pub mod compaction;
pub mod compression;
pub mod headers;
pub mod container;
pub mod telemetry;

// Caller-facing API
pub mod pipeline;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compaction::{
        compact, compact_document, expand, expand_document, Category, CategoryTable,
        CompactDocument, Event, ExpandedDocument,
    };
    pub use crate::container::{decode_container, decode_document, encode_container};
    pub use crate::headers::{ContainerHeader, MetadataPolicy};
    pub use crate::pipeline::{ApiConfig, PackParams};
    pub use crate::types::ConvertError;
    pub use crate::version::VersionPolicy;
}
