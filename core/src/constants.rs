//! constants.rs
//! Format markers, field names and container defaults shared by every layer.

/// Version prefix an expanded (source generation) document must declare.
pub const SOURCE_VERSION_PREFIX: &str = "3.";
/// Version prefix a compact (target generation) document must declare.
pub const TARGET_VERSION_PREFIX: &str = "4.";
/// Version written into every compact document produced by the compactor.
pub const TARGET_VERSION: &str = "4.0.0";
/// Reported when a document carries no `version` field.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Top-level document field holding the version marker.
pub const VERSION_FIELD: &str = "version";
/// Timing key every timed object carries (beat position).
pub const TIMING_KEY: &str = "b";
/// Explicit data index written on an event when it cannot be implied.
pub const INDEX_KEY: &str = "i";
/// Suffix of the payload array paired with each events array.
pub const DATA_SUFFIX: &str = "Data";

/// Obsolete per-note field dropped from color notes (cut angle offset).
pub const COLOR_NOTE_DROPPED_FIELD: &str = "a";

/// Container header alignment (bytes). The compressed member must start on it.
pub const HEADER_ALIGNMENT: usize = 4;
/// `u32` little-endian name length prefix.
pub const NAME_LEN_PREFIX: usize = 4;
/// Single `0x00` after the name.
pub const NAME_TERMINATOR_LEN: usize = 1;
/// Three little-endian `u16`: `(0, metadata, 0)`.
pub const METADATA_BLOCK_LEN: usize = 6;
/// Fixed header bytes excluding name and padding.
pub const HEADER_FIXED_LEN: usize = NAME_LEN_PREFIX + NAME_TERMINATOR_LEN + METADATA_BLOCK_LEN;

/// Default amount subtracted from the compressed length to derive metadata.
/// Observed containers sit in `[len - 3, len]`; this is a heuristic, not a rule.
pub const DEFAULT_METADATA_OFFSET: i64 = 1;

/// Maximum gzip level (best compression).
pub const MAX_COMPRESSION_LEVEL: u32 = 9;
