//! compression/codecs/gzip.rs
//! Gzip member codec via flate2.
//!
//! Design notes:
//! - `GzBuilder` with no filename and `mtime = 0`, so identical input yields
//!   identical bytes across runs.
//! - At level 9 flate2 writes XFL = 2 and OS = 255 (unknown), the same header
//!   bytes a reference gzip writer emits with a zero timestamp.
//! - The deflate body itself depends on the backend and is not guaranteed to be
//!   bit-identical to other implementations.

use std::io::{Read, Write};

use flate2::{read::GzDecoder, Compression, GzBuilder};

use crate::compression::constants::{DEFAULT_LEVEL_GZIP, GZIP_MAGIC, GZIP_MTIME};
use crate::compression::types::{CompressionError, Compressor, Decompressor};
use crate::constants::MAX_COMPRESSION_LEVEL;
use crate::utils::fmt_bytes;

const CODEC: &str = "gzip";

#[derive(Debug, Clone, Copy)]
pub struct GzipCompressor {
    level: Compression,
}

impl GzipCompressor {
    pub fn new(level: u32) -> Result<Self, CompressionError> {
        if level > MAX_COMPRESSION_LEVEL {
            return Err(CompressionError::InvalidLevel { have: level, max: MAX_COMPRESSION_LEVEL });
        }
        Ok(Self { level: Compression::new(level) })
    }
}

impl Default for GzipCompressor {
    fn default() -> Self {
        Self { level: Compression::new(DEFAULT_LEVEL_GZIP) }
    }
}

impl Compressor for GzipCompressor {
    fn compress(&self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let mut enc = GzBuilder::new().mtime(GZIP_MTIME).write(out, self.level);
        enc.write_all(input)
            .map_err(|e| CompressionError::CodecProcessFailed { codec: CODEC, msg: e.to_string() })?;
        enc.finish()
            .map_err(|e| CompressionError::CodecProcessFailed { codec: CODEC, msg: e.to_string() })?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GzipDecompressor;

impl Decompressor for GzipDecompressor {
    fn decompress(&self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        if input.len() < GZIP_MAGIC.len() || input[..2] != GZIP_MAGIC {
            let end = input.len().min(GZIP_MAGIC.len());
            return Err(CompressionError::NotGzip { found: fmt_bytes(&input[..end]) });
        }

        let mut dec = GzDecoder::new(input);
        dec.read_to_end(out)
            .map_err(|e| CompressionError::CodecProcessFailed { codec: CODEC, msg: e.to_string() })?;
        Ok(())
    }
}

/// Compress `input` into a fresh gzip member at `level`.
pub fn gzip(input: &[u8], level: u32) -> Result<Vec<u8>, CompressionError> {
    let mut out = Vec::new();
    GzipCompressor::new(level)?.compress(input, &mut out)?;
    Ok(out)
}

/// Decompress a single gzip member.
pub fn gunzip(input: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut out = Vec::new();
    GzipDecompressor.decompress(input, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_pinned() {
        let member = gzip(b"{\"version\":\"4.0.0\"}", 9).unwrap();
        assert_eq!(&member[..2], &GZIP_MAGIC);
        assert_eq!(member[2], 8); // deflate
        assert_eq!(member[3], 0); // no FNAME / FEXTRA / FCOMMENT
        assert_eq!(&member[4..8], &[0, 0, 0, 0]); // mtime
        assert_eq!(member[8], 2); // max compression
    }

    #[test]
    fn output_is_deterministic() {
        let a = gzip(b"same input", 9).unwrap();
        let b = gzip(b"same input", 9).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn default_compressor_is_best_level() {
        let mut out = Vec::new();
        GzipCompressor::default().compress(b"same input", &mut out).unwrap();
        assert_eq!(out, gzip(b"same input", DEFAULT_LEVEL_GZIP).unwrap());
        assert_eq!(out[8], 2);
    }

    #[test]
    fn rejects_level_above_nine() {
        assert!(matches!(
            GzipCompressor::new(10),
            Err(CompressionError::InvalidLevel { have: 10, max: 9 })
        ));
    }

    #[test]
    fn gunzip_rejects_non_gzip() {
        assert!(matches!(gunzip(b"PK\x03\x04"), Err(CompressionError::NotGzip { .. })));
    }
}
