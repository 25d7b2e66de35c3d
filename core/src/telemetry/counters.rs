//! telemetry/counters.rs
//! Mutable counters used during a conversion.
//!
//! Summary: collects per-category event/record counts and byte sizes.
//! Converted into an immutable `ConversionSnapshot` at the end of a run.

use std::collections::BTreeMap;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::compaction::{Category, CompactDocument};

/// Events vs unique data records of one category.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub events: u64,
    pub unique_data: u64,
}

impl CategoryStats {
    /// Events that point at a record shared with an earlier event.
    pub fn reused(&self) -> u64 {
        self.events.saturating_sub(self.unique_data)
    }
}

impl AddAssign for CategoryStats {
    fn add_assign(&mut self, rhs: Self) {
        self.events      += rhs.events;
        self.unique_data += rhs.unique_data;
    }
}

#[derive(Default, Clone, Debug, PartialEq)]
pub struct ConversionCounters {
    pub categories: BTreeMap<Category, CategoryStats>,
    /// Expanded input text.
    pub bytes_input: u64,
    /// Canonical compact text.
    pub bytes_serialized: u64,
    /// Gzip member.
    pub bytes_compressed: u64,
    /// Container header.
    pub bytes_header: u64,
}

impl ConversionCounters {
    /// Record the table sizes of every category in `doc`.
    pub fn add_document(&mut self, doc: &CompactDocument) {
        for (category, table) in doc.tables() {
            *self.categories.entry(category).or_default() += CategoryStats {
                events: table.events.len() as u64,
                unique_data: table.data.len() as u64,
            };
        }
    }

    pub fn add_input(&mut self, len: usize) {
        self.bytes_input += len as u64;
    }

    pub fn add_serialized(&mut self, len: usize) {
        self.bytes_serialized += len as u64;
    }

    /// Record one packed container.
    pub fn add_container(&mut self, header_len: usize, payload_len: usize) {
        self.bytes_header += header_len as u64;
        self.bytes_compressed += payload_len as u64;
    }

    pub fn total_events(&self) -> u64 {
        self.categories.values().map(|s| s.events).sum()
    }

    pub fn total_unique_data(&self) -> u64 {
        self.categories.values().map(|s| s.unique_data).sum()
    }
}

impl AddAssign for ConversionCounters {
    fn add_assign(&mut self, rhs: Self) {
        for (category, stats) in rhs.categories {
            *self.categories.entry(category).or_default() += stats;
        }
        self.bytes_input      += rhs.bytes_input;
        self.bytes_serialized += rhs.bytes_serialized;
        self.bytes_compressed += rhs.bytes_compressed;
        self.bytes_header     += rhs.bytes_header;
    }
}
