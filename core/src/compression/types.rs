//! compression/types.rs
//! Codec traits and errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    /// Level outside the codec's range.
    #[error("invalid compression level: {have} > {max}")]
    InvalidLevel { have: u32, max: u32 },

    /// Input does not start with a gzip member.
    #[error("not a gzip member: expected magic 1f8b, got {found}")]
    NotGzip { found: String },

    #[error("codec {codec} process failed: {msg}")]
    CodecProcessFailed { codec: &'static str, msg: String },
}

// Require Send so trait objects can cross thread boundaries.
pub trait Compressor: Send {
    /// Compress `input` as one self-contained stream appended to `out`.
    fn compress(&self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError>;
}

pub trait Decompressor: Send {
    /// Decompress one stream from `input`, appending plaintext to `out`.
    fn decompress(&self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError>;
}
