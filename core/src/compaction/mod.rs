//! compaction/mod.rs
//! Structural compactor: expanded beatmap records <-> compact `(events, data)` tables.
//!
//! Notes:
//! - Each category is compacted independently with its own dedup map.
//! - `colorNotes` drops the obsolete `a` field; `sliders`, `burstSliders` and
//!   `waypoints` are renamed to `arcs`, `chains` and `spawnRotations`.
//! - `expand` is the inverse used for round-trip checks.

pub mod types;
pub mod canonical;
pub mod compact;
pub mod expand;

pub use types::*;
pub use canonical::*;
pub use compact::*;
pub use expand::*;
