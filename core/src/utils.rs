//! utils.rs
//! Byte-layout helpers and diagnostic formatting.

use crate::constants::{HEADER_ALIGNMENT, HEADER_FIXED_LEN};

/// Zero bytes needed after `len` bytes to reach the next multiple of `align`.
///
/// `align` must be non-zero.
#[inline]
pub const fn pad_to(len: usize, align: usize) -> usize {
    (align - len % align) % align
}

/// Padding inserted between the name terminator and the metadata block for a
/// container name of `name_len` bytes.
///
/// `(4 - (4 + name_len + 1 + 6) % 4) % 4`
#[inline]
pub const fn header_padding(name_len: usize) -> usize {
    pad_to(HEADER_FIXED_LEN + name_len % HEADER_ALIGNMENT, HEADER_ALIGNMENT)
}

/// Total header length for a container name of `name_len` bytes.
#[inline]
pub const fn header_len(name_len: usize) -> usize {
    HEADER_FIXED_LEN + name_len + header_padding(name_len)
}

#[inline]
pub const fn is_aligned(offset: usize) -> bool {
    offset % HEADER_ALIGNMENT == 0
}

/// Printable ASCII renders as a byte string, anything else as hex.
pub fn fmt_bytes(b: &[u8]) -> String {
    if b.iter().all(|&c| c.is_ascii_graphic() || c == b' ') {
        format!("b\"{}\"", String::from_utf8_lossy(b))
    } else {
        format!("0x{}", hex::encode(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_matches_formula() {
        for n in 0..64usize {
            assert_eq!(header_padding(n), (4 - (4 + n + 1 + 6) % 4) % 4);
            assert!(is_aligned(header_len(n)));
        }
    }

    #[test]
    fn pad_to_already_aligned_is_zero() {
        assert_eq!(pad_to(28, 4), 0);
        assert_eq!(pad_to(29, 4), 3);
    }
}
