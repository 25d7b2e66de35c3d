//! compression/mod.rs
//! Compression of the serialized compact document.
//!
//! Notes:
//! - The payload is a single self-contained gzip member.
//! - Header filename and mtime are pinned so output is deterministic.

pub mod constants;
pub mod types;
pub mod codecs;

pub use constants::*;
pub use types::*;
pub use codecs::*;
