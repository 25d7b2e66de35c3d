//! compaction/expand.rs
//! Inverse of compaction: merge each event's timing with its resolved record.

use serde_json::{Map, Value};

use crate::compaction::types::{
    Category, CategoryTable, CompactDocument, CompactError, ExpandedDocument, TimedObject,
};
use crate::constants::{TIMING_KEY, VERSION_FIELD};

/// Rebuild the timed objects of one category table.
///
/// The timing key comes first, followed by the record's fields in stored order.
pub fn expand(
    table: &CategoryTable,
    timing_key: &str,
    category: Category,
) -> Result<Vec<TimedObject>, CompactError> {
    table
        .events
        .iter()
        .enumerate()
        .map(|(position, event)| {
            let index = event.resolved_index(position);
            let record = table.data.get(index).ok_or(CompactError::IndexOutOfRange {
                category,
                position,
                index,
                len: table.data.len(),
            })?;

            let mut object = Map::with_capacity(record.len() + 1);
            object.insert(timing_key.to_string(), Value::Number(event.timing.clone()));
            for (k, v) in record {
                object.insert(k.clone(), v.clone());
            }
            Ok(object)
        })
        .collect()
}

/// Rebuild an expanded document declaring `version`. Categories are written
/// under their source field names; dropped fields are not restored.
pub fn expand_document(doc: &CompactDocument, version: &str) -> Result<ExpandedDocument, CompactError> {
    let mut root = Map::new();
    root.insert(VERSION_FIELD.to_string(), Value::String(version.to_string()));

    for (category, table) in doc.tables() {
        let objects = expand(table, TIMING_KEY, category)?;
        root.insert(
            category.source_field().to_string(),
            Value::Array(objects.into_iter().map(Value::Object).collect()),
        );
    }

    Ok(ExpandedDocument::from(root))
}
