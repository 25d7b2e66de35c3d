//! telemetry/mod.rs
//! Conversion telemetry: counters, stage timers and immutable snapshots.
//!
//! Notes:
//! - Counters are filled while a document moves through the pipeline.
//! - `ConversionSnapshot` is the serializable summary returned to callers
//!   (per-category dedup stats, size reduction, compression ratio, timings).

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
