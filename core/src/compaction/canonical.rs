//! compaction/canonical.rs
//! Order-independent canonical form of payload records.
//!
//! Design notes:
//! - Mappings become `(name, value)` lists sorted by field name, recursively.
//! - Numbers compare by value: `0` and `0.0` are the same payload value.
//!   Integral floats fold into `Integer`, so derived `Eq` matches numeric equality.
//! - The derived `Ord` is a total order over every JSON value; it is a lookup
//!   key, not a numeric ordering.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde_json::{Number, Value};

use crate::compaction::types::PayloadRecord;

/// Non-integral float with total ordering.
#[derive(Debug, Clone, Copy)]
pub struct CanonicalFloat(f64);

impl PartialEq for CanonicalFloat {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for CanonicalFloat {}

impl PartialOrd for CanonicalFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CanonicalFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for CanonicalFloat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CanonicalValue {
    Null,
    Bool(bool),
    Integer(i128),
    Float(CanonicalFloat),
    String(String),
    Array(Vec<CanonicalValue>),
    Object(Vec<(String, CanonicalValue)>),
}

fn canonical_number(n: &Number) -> CanonicalValue {
    if let Some(i) = n.as_i64() {
        return CanonicalValue::Integer(i as i128);
    }
    if let Some(u) = n.as_u64() {
        return CanonicalValue::Integer(u as i128);
    }
    // JSON numbers are finite; as_f64 only fails under arbitrary_precision.
    let f = n.as_f64().unwrap_or(f64::NAN);
    if f.fract() == 0.0 && f.abs() <= u64::MAX as f64 {
        CanonicalValue::Integer(f as i128)
    } else {
        CanonicalValue::Float(CanonicalFloat(f))
    }
}

/// Canonical form of any JSON value.
pub fn canonical_value(v: &Value) -> CanonicalValue {
    match v {
        Value::Null      => CanonicalValue::Null,
        Value::Bool(b)   => CanonicalValue::Bool(*b),
        Value::Number(n) => canonical_number(n),
        Value::String(s) => CanonicalValue::String(s.clone()),
        Value::Array(a)  => CanonicalValue::Array(a.iter().map(canonical_value).collect()),
        Value::Object(m) => canonical_fields(m.iter()),
    }
}

/// Canonical form of a payload record, used as the dedup lookup key.
pub fn canonical_payload(record: &PayloadRecord) -> CanonicalValue {
    canonical_fields(record.iter())
}

fn canonical_fields<'a, I>(fields: I) -> CanonicalValue
where
    I: Iterator<Item = (&'a String, &'a Value)>,
{
    let mut pairs: Vec<(String, CanonicalValue)> = fields
        .map(|(k, v)| (k.clone(), canonical_value(v)))
        .collect();
    // Field names are unique within a mapping.
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    CanonicalValue::Object(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> PayloadRecord {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn field_order_does_not_matter() {
        let a = record(json!({"x": 1, "y": 2, "c": 0}));
        let b = record(json!({"c": 0, "y": 2, "x": 1}));
        assert_eq!(canonical_payload(&a), canonical_payload(&b));
    }

    #[test]
    fn integral_float_equals_integer() {
        let a = record(json!({"x": 1}));
        let b = record(json!({"x": 1.0}));
        assert_eq!(canonical_payload(&a), canonical_payload(&b));
    }

    #[test]
    fn nested_mappings_compare_structurally() {
        let a = record(json!({"customData": {"color": [1, 0.5, 0], "track": "a"}}));
        let b = record(json!({"customData": {"track": "a", "color": [1, 0.5, 0]}}));
        let c = record(json!({"customData": {"track": "a", "color": [0.5, 1, 0]}}));
        assert_eq!(canonical_payload(&a), canonical_payload(&b));
        assert_ne!(canonical_payload(&a), canonical_payload(&c));
    }

    #[test]
    fn string_and_number_differ() {
        let a = record(json!({"x": "1"}));
        let b = record(json!({"x": 1}));
        assert_ne!(canonical_payload(&a), canonical_payload(&b));
    }
}
