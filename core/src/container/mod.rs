//! container/mod.rs
//! Container codec: canonical compact text -> gzip member -> aligned header + payload.
//!
//! Notes:
//! - Encoding is pure and in-memory; reading and writing files is the caller's job.
//! - `decode_container` is the exact inverse of the header framing and never
//!   returns a partially decoded container.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
