//! compaction/types.rs
//! Category registry, compact/expanded document types and compaction errors.
//!
//! Design notes:
//! - Timed objects and payload records stay as `serde_json::Map` so arbitrary
//!   payload fields (nested mappings included) survive untouched.
//! - `CompactDocument` always holds all six category tables; serialization
//!   emits them in the fixed `version, <name>, <name>Data, ...` order.
//! - Event timing keeps the original JSON number (`1` stays `1`, `1.0` stays `1.0`).

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::compaction::canonical::canonical_payload;
use crate::constants::{COLOR_NOTE_DROPPED_FIELD, TARGET_VERSION, UNKNOWN_VERSION, VERSION_FIELD};

/// One timed object of the expanded representation.
pub type TimedObject = Map<String, Value>;

/// Payload fields shared by one or more timed objects.
pub type PayloadRecord = Map<String, Value>;

/// The six object categories of a beatmap.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    ColorNotes,
    BombNotes,
    Obstacles,
    Arcs,
    Chains,
    SpawnRotations,
}

impl Category {
    /// Serialization order of the compact document.
    pub const ALL: [Category; 6] = [
        Category::ColorNotes,
        Category::BombNotes,
        Category::Obstacles,
        Category::Arcs,
        Category::Chains,
        Category::SpawnRotations,
    ];

    /// Field read from the expanded document.
    pub const fn source_field(self) -> &'static str {
        match self {
            Category::ColorNotes     => "colorNotes",
            Category::BombNotes      => "bombNotes",
            Category::Obstacles      => "obstacles",
            Category::Arcs           => "sliders",
            Category::Chains         => "burstSliders",
            Category::SpawnRotations => "waypoints",
        }
    }

    /// Events array written to the compact document.
    pub const fn target_field(self) -> &'static str {
        match self {
            Category::ColorNotes     => "colorNotes",
            Category::BombNotes      => "bombNotes",
            Category::Obstacles      => "obstacles",
            Category::Arcs           => "arcs",
            Category::Chains         => "chains",
            Category::SpawnRotations => "spawnRotations",
        }
    }

    /// Payload array paired with `target_field`.
    pub const fn data_field(self) -> &'static str {
        match self {
            Category::ColorNotes     => "colorNotesData",
            Category::BombNotes      => "bombNotesData",
            Category::Obstacles      => "obstaclesData",
            Category::Arcs           => "arcsData",
            Category::Chains         => "chainsData",
            Category::SpawnRotations => "spawnRotationsData",
        }
    }

    /// Fields that do not exist in the compact generation and are dropped
    /// from the payload before deduplication.
    pub const fn dropped_fields(self) -> &'static [&'static str] {
        match self {
            Category::ColorNotes => &[COLOR_NOTE_DROPPED_FIELD],
            _ => &[],
        }
    }

    #[inline]
    pub const fn slot(self) -> usize {
        self as usize
    }

    /// Payload of `object`: every field except the timing key and the
    /// category's dropped fields, in input order.
    pub fn payload_of(self, object: &TimedObject, timing_key: &str) -> PayloadRecord {
        let dropped = self.dropped_fields();
        object
            .iter()
            .filter(|(k, _)| k.as_str() != timing_key && !dropped.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target_field())
    }
}

/// Lightweight timing event. `index` is omitted when it equals the event's
/// own position in the events array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "b")]
    pub timing: Number,
    #[serde(rename = "i", default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl Event {
    pub fn implicit(timing: Number) -> Self {
        Self { timing, index: None }
    }

    pub fn explicit(timing: Number, index: usize) -> Self {
        Self { timing, index: Some(index) }
    }

    /// Data index this event refers to when stored at `position`.
    #[inline]
    pub fn resolved_index(&self, position: usize) -> usize {
        self.index.unwrap_or(position)
    }
}

/// `(events, data)` pair of one category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTable {
    pub events: Vec<Event>,
    pub data: Vec<PayloadRecord>,
}

impl CategoryTable {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.data.is_empty()
    }

    /// Check the table invariants:
    /// - every event resolves to an index inside `data`
    /// - `data` holds no two structurally equal records
    pub fn validate(&self, category: Category) -> Result<(), CompactError> {
        for (position, event) in self.events.iter().enumerate() {
            let index = event.resolved_index(position);
            if index >= self.data.len() {
                return Err(CompactError::IndexOutOfRange {
                    category,
                    position,
                    index,
                    len: self.data.len(),
                });
            }
        }

        let mut seen = std::collections::BTreeMap::new();
        for (index, record) in self.data.iter().enumerate() {
            if let Some(first) = seen.insert(canonical_payload(record), index) {
                return Err(CompactError::DuplicatePayload { category, first, second: index });
            }
        }
        Ok(())
    }
}

/// Compact (target generation) document: one table per category.
#[derive(Debug, Clone, PartialEq)]
pub struct CompactDocument {
    pub version: String,
    tables: [CategoryTable; 6],
}

impl Default for CompactDocument {
    fn default() -> Self {
        Self {
            version: TARGET_VERSION.to_string(),
            tables: Default::default(),
        }
    }
}

impl CompactDocument {
    pub fn new(version: impl Into<String>) -> Self {
        Self { version: version.into(), ..Default::default() }
    }

    pub fn table(&self, category: Category) -> &CategoryTable {
        &self.tables[category.slot()]
    }

    pub fn set_table(&mut self, category: Category, table: CategoryTable) {
        self.tables[category.slot()] = table;
    }

    pub fn tables(&self) -> impl Iterator<Item = (Category, &CategoryTable)> {
        Category::ALL.into_iter().map(move |c| (c, self.table(c)))
    }

    pub fn validate(&self) -> Result<(), CompactError> {
        self.tables().try_for_each(|(c, t)| t.validate(c))
    }

    /// Parse a compact document. All twelve arrays and `version` are required.
    pub fn from_value(value: Value) -> Result<Self, CompactError> {
        let mut root = match value {
            Value::Object(map) => map,
            other => return Err(CompactError::NotAnObject { found: value_kind(&other) }),
        };

        let version = match root.remove(VERSION_FIELD) {
            Some(Value::String(s)) => s,
            Some(other) => {
                return Err(CompactError::InvalidField {
                    field: VERSION_FIELD.to_string(),
                    expected: "string",
                    found: value_kind(&other),
                })
            }
            None => return Err(CompactError::MissingField { field: VERSION_FIELD.to_string() }),
        };

        let mut doc = CompactDocument::new(version);
        for category in Category::ALL {
            let events = take_array(&mut root, category.target_field())?;
            let data = take_array(&mut root, category.data_field())?;

            let events = events
                .into_iter()
                .enumerate()
                .map(|(position, v)| {
                    serde_json::from_value::<Event>(v).map_err(|e| CompactError::InvalidEvent {
                        category,
                        position,
                        msg: e.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let data = data
                .into_iter()
                .enumerate()
                .map(|(position, v)| match v {
                    Value::Object(map) => Ok(map),
                    other => Err(CompactError::InvalidObject {
                        category,
                        position,
                        found: value_kind(&other),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;

            doc.set_table(category, CategoryTable { events, data });
        }
        Ok(doc)
    }
}

impl Serialize for CompactDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + 2 * Category::ALL.len()))?;
        map.serialize_entry(VERSION_FIELD, &self.version)?;
        for (category, table) in self.tables() {
            map.serialize_entry(category.target_field(), &table.events)?;
            map.serialize_entry(category.data_field(), &table.data)?;
        }
        map.end()
    }
}

/// Expanded (source generation) document as read from upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedDocument {
    root: Map<String, Value>,
}

impl ExpandedDocument {
    pub fn from_value(value: Value) -> Result<Self, CompactError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(CompactError::NotAnObject { found: value_kind(&other) }),
        }
    }

    /// Declared version, or `"unknown"` when absent or not a string.
    pub fn version(&self) -> &str {
        self.root
            .get(VERSION_FIELD)
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_VERSION)
    }

    /// Timed objects of `category`. Absent or `null` fields yield no objects.
    pub fn objects(&self, category: Category) -> Result<Vec<&TimedObject>, CompactError> {
        let field = category.source_field();
        let items = match self.root.get(field) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(CompactError::InvalidField {
                    field: field.to_string(),
                    expected: "array",
                    found: value_kind(other),
                })
            }
        };

        items
            .iter()
            .enumerate()
            .map(|(position, item)| {
                item.as_object().ok_or(CompactError::InvalidObject {
                    category,
                    position,
                    found: value_kind(item),
                })
            })
            .collect()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }
}

impl From<Map<String, Value>> for ExpandedDocument {
    fn from(root: Map<String, Value>) -> Self {
        Self { root }
    }
}

fn take_array(root: &mut Map<String, Value>, field: &str) -> Result<Vec<Value>, CompactError> {
    match root.remove(field) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(CompactError::InvalidField {
            field: field.to_string(),
            expected: "array",
            found: value_kind(&other),
        }),
        None => Err(CompactError::MissingField { field: field.to_string() }),
    }
}

/// JSON type name used in diagnostics.
pub fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null      => "null",
        Value::Bool(_)   => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_)  => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CompactError {
    /// Document root is not a mapping.
    #[error("document root must be an object, got {found}")]
    NotAnObject { found: &'static str },

    /// Required document field absent.
    #[error("missing field `{field}`")]
    MissingField { field: String },

    /// Document field present with the wrong JSON type.
    #[error("field `{field}`: expected {expected}, got {found}")]
    InvalidField { field: String, expected: &'static str, found: &'static str },

    /// Category element is not a mapping.
    #[error("{category}[{position}]: expected object, got {found}")]
    InvalidObject { category: Category, position: usize, found: &'static str },

    /// Timed object without its timing key.
    #[error("{category}[{position}]: missing timing key `{key}`")]
    MissingTimingKey { category: Category, position: usize, key: String },

    /// Timing key present but not a number.
    #[error("{category}[{position}]: timing key `{key}` must be a number, got {found}")]
    NonNumericTiming { category: Category, position: usize, key: String, found: &'static str },

    /// Event could not be parsed.
    #[error("{category}[{position}]: invalid event: {msg}")]
    InvalidEvent { category: Category, position: usize, msg: String },

    /// Event resolves to an index outside the data array.
    #[error("{category}[{position}]: data index {index} out of range (len {len})")]
    IndexOutOfRange { category: Category, position: usize, index: usize, len: usize },

    /// Two data records are structurally equal.
    #[error("{category}: data records {first} and {second} are equal")]
    DuplicatePayload { category: Category, first: usize, second: usize },
}
