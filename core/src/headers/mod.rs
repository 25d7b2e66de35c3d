//! headers/mod.rs
//! Container header: length-prefixed ASCII name, terminator, alignment padding, metadata block.
//!
//! Notes:
//! - Header length is always a multiple of 4 so the gzip member that follows
//!   starts on a 4-byte boundary; downstream asset patchers rely on it.
//! - Little-endian across all multi-byte integers.
//! - The metadata value is heuristic by default (`compressed_len - 1`); see `MetadataPolicy`.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
