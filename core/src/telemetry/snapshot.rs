//! telemetry/snapshot.rs
//! Immutable summary of one conversion run.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::compaction::Category;
use crate::telemetry::counters::{CategoryStats, ConversionCounters};
use crate::telemetry::timers::{StageTimes, TelemetryTimer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionSnapshot {
    pub categories: BTreeMap<Category, CategoryStats>,
    pub bytes_input: u64,
    pub bytes_serialized: u64,
    pub bytes_compressed: u64,
    pub bytes_header: u64,
    /// Metadata value written into the container header, if one was packed.
    pub metadata: Option<u16>,
    /// `(1 - serialized / input) * 100`; 0 when there was no expanded input.
    pub size_reduction_percent: f64,
    /// `compressed / serialized`; 0 when nothing was compressed.
    pub compression_ratio: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl ConversionSnapshot {
    pub fn from(counters: &ConversionCounters, timer: &TelemetryTimer, metadata: Option<u16>) -> Self {
        let size_reduction_percent = if counters.bytes_input > 0 {
            (1.0 - counters.bytes_serialized as f64 / counters.bytes_input as f64) * 100.0
        } else {
            0.0
        };

        let compression_ratio = if counters.bytes_serialized > 0 && counters.bytes_compressed > 0 {
            counters.bytes_compressed as f64 / counters.bytes_serialized as f64
        } else {
            0.0
        };

        Self {
            categories: counters.categories.clone(),
            bytes_input: counters.bytes_input,
            bytes_serialized: counters.bytes_serialized,
            bytes_compressed: counters.bytes_compressed,
            bytes_header: counters.bytes_header,
            metadata,
            size_reduction_percent,
            compression_ratio,
            elapsed: timer.elapsed(),
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn category(&self, category: Category) -> CategoryStats {
        self.categories.get(&category).copied().unwrap_or_default()
    }

    /// Header plus compressed payload.
    pub fn output_bytes(&self) -> u64 {
        self.bytes_header + self.bytes_compressed
    }

    /// Internal consistency:
    /// - no category has more unique records than events
    /// - stage times never exceed elapsed time
    pub fn sanity_check(&self) -> bool {
        self.categories.values().all(|s| s.unique_data <= s.events)
            && self.stage_times.total() <= self.elapsed
    }
}
