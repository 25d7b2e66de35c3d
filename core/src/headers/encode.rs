//! headers/encode.rs
//!
//! Header encoding.
//!
//! Design notes:
//! - Validates before writing: non-ASCII names and non-zero reserved words never reach the wire.
//! - Writes into a buffer sized from the layout, then re-checks alignment on the result.

use byteorder::{ByteOrder, LittleEndian};
use tracing::debug;

use crate::headers::types::{ContainerHeader, HeaderError};
use crate::utils::is_aligned;

/// Serialize `h` into its little-endian wire form.
///
/// # Returns
/// - `Ok(Vec<u8>)` of length `h.len()`, always a multiple of 4.
/// - `Err(HeaderError)` if validation fails or the computed length is misaligned.
pub fn encode_header_le(h: &ContainerHeader) -> Result<Vec<u8>, HeaderError> {
    h.validate()?;

    let layout = h.layout();
    let mut out = vec![0u8; layout.payload_offset];

    LittleEndian::write_u32(&mut out[0..layout.name.start], h.name_len() as u32);
    out[layout.name.clone()].copy_from_slice(h.name.as_bytes());
    // terminator and padding are already zero
    let meta = &mut out[layout.metadata.clone()];
    LittleEndian::write_u16(&mut meta[0..2], h.reserved[0]);
    LittleEndian::write_u16(&mut meta[2..4], h.metadata);
    LittleEndian::write_u16(&mut meta[4..6], h.reserved[1]);

    if !is_aligned(out.len()) {
        return Err(HeaderError::Misaligned { len: out.len() });
    }

    debug!(
        name = %h.name,
        name_len = h.name_len(),
        padding = h.padding(),
        metadata = h.metadata,
        header_len = out.len(),
        "encoded container header"
    );

    Ok(out)
}
