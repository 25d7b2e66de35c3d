//! compaction/compact.rs
//! Expanded timed objects -> `(events, data)` tables.
//!
//! Design notes:
//! - One canonical-payload map per `compact` call; nothing is shared between
//!   categories or documents.
//! - An event carries an explicit index iff the assigned data index differs
//!   from the event's own position. This is a position comparison, not a
//!   cache-hit flag: a fresh payload can still need `i` once an earlier reuse
//!   has put `events` ahead of `data`.

use std::collections::btree_map::{BTreeMap, Entry};

use serde_json::{Number, Value};
use tracing::debug;

use crate::compaction::canonical::{canonical_payload, CanonicalValue};
use crate::compaction::types::{
    value_kind, Category, CategoryTable, CompactDocument, CompactError, Event, ExpandedDocument,
    TimedObject,
};
use crate::constants::{TARGET_VERSION, TIMING_KEY};

fn timing_of(
    object: &TimedObject,
    timing_key: &str,
    category: Category,
    position: usize,
) -> Result<Number, CompactError> {
    match object.get(timing_key) {
        Some(Value::Number(n)) => Ok(n.clone()),
        Some(other) => Err(CompactError::NonNumericTiming {
            category,
            position,
            key: timing_key.to_string(),
            found: value_kind(other),
        }),
        None => Err(CompactError::MissingTimingKey {
            category,
            position,
            key: timing_key.to_string(),
        }),
    }
}

/// Split `objects` into timing events and deduplicated payload records.
///
/// Events keep input order, one per object. Payloads are compared after the
/// category's field adjustment, independent of field order.
pub fn compact<'a, I>(
    objects: I,
    timing_key: &str,
    category: Category,
) -> Result<CategoryTable, CompactError>
where
    I: IntoIterator<Item = &'a TimedObject>,
{
    let mut table = CategoryTable::default();
    let mut assigned: BTreeMap<CanonicalValue, usize> = BTreeMap::new();

    for (position, object) in objects.into_iter().enumerate() {
        let timing = timing_of(object, timing_key, category, position)?;
        let payload = category.payload_of(object, timing_key);

        let index = match assigned.entry(canonical_payload(&payload)) {
            Entry::Occupied(slot) => *slot.get(),
            Entry::Vacant(slot) => {
                let index = table.data.len();
                table.data.push(payload);
                *slot.insert(index)
            }
        };

        let event = if index == table.events.len() {
            Event::implicit(timing)
        } else {
            Event::explicit(timing, index)
        };
        table.events.push(event);
    }

    Ok(table)
}

/// Compact every category of `input`. All six tables are always present;
/// absent or empty source categories yield empty tables.
pub fn compact_document(input: &ExpandedDocument) -> Result<CompactDocument, CompactError> {
    let mut doc = CompactDocument::new(TARGET_VERSION);

    for category in Category::ALL {
        let objects = input.objects(category)?;
        let table = compact(objects, TIMING_KEY, category)?;
        debug!(
            category = %category,
            events = table.events.len(),
            unique_data = table.data.len(),
            "compacted category"
        );
        doc.set_table(category, table);
    }

    Ok(doc)
}
