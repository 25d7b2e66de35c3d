//! headers/decode.rs
//!
//! Header decoding.
//!
//! Design notes:
//! - Reads the name length first, then requires the whole computed header to be present
//!   before touching any other field; no partial decode.
//! - Padding is skipped by the same formula the encoder uses.
//! - Reserved metadata words are preserved as read.

use byteorder::{ByteOrder, LittleEndian};

use crate::constants::{HEADER_FIXED_LEN, NAME_LEN_PREFIX};
use crate::headers::types::{ContainerHeader, HeaderError, HeaderLayout};
use crate::utils::{fmt_bytes, header_padding};

/// Deserialize a container header from the front of `buf`.
///
/// # Returns
/// - `Ok((header, payload_offset))` on success.
/// - `Err(HeaderError::BufferTooShort)` if `buf` ends before the computed header length.
/// - `Err(HeaderError::NonZeroTerminator)` if the byte after the name is not zero.
/// - `Err(HeaderError::NonAsciiName)` if the name bytes are not ASCII.
pub fn decode_header_le(buf: &[u8]) -> Result<(ContainerHeader, usize), HeaderError> {
    if buf.len() < NAME_LEN_PREFIX {
        return Err(HeaderError::BufferTooShort { have: buf.len(), need: NAME_LEN_PREFIX });
    }

    let name_len = LittleEndian::read_u32(&buf[0..NAME_LEN_PREFIX]) as usize;
    if name_len > buf.len() {
        return Err(HeaderError::BufferTooShort {
            have: buf.len(),
            need: name_len
                .saturating_add(HEADER_FIXED_LEN)
                .saturating_add(header_padding(name_len)),
        });
    }
    let layout = HeaderLayout::for_name_len(name_len);
    if layout.payload_offset > buf.len() {
        return Err(HeaderError::BufferTooShort { have: buf.len(), need: layout.payload_offset });
    }

    let name_bytes = &buf[layout.name.clone()];
    if !name_bytes.is_ascii() {
        return Err(HeaderError::NonAsciiName { name: fmt_bytes(name_bytes) });
    }
    // ASCII is valid UTF-8.
    let name = String::from_utf8_lossy(name_bytes).into_owned();

    let terminator = buf[layout.terminator];
    if terminator != 0 {
        return Err(HeaderError::NonZeroTerminator { found: terminator });
    }

    let meta = &buf[layout.metadata.clone()];
    let header = ContainerHeader {
        name,
        metadata: LittleEndian::read_u16(&meta[2..4]),
        reserved: [LittleEndian::read_u16(&meta[0..2]), LittleEndian::read_u16(&meta[4..6])],
    };

    Ok((header, layout.payload_offset))
}
