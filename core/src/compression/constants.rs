//! compression/constants.rs
//! Gzip member defaults.

use crate::constants::MAX_COMPRESSION_LEVEL;

/// Containers are written at maximum compression.
pub const DEFAULT_LEVEL_GZIP: u32 = MAX_COMPRESSION_LEVEL;

/// Pinned gzip header modification time (no timestamp).
pub const GZIP_MTIME: u32 = 0;

/// Gzip member magic (`1f 8b`).
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
