//! shape.rs - Source-shape bookkeeping for lossless re-encoding.
//!
//! The typed model reads `null`, `""`, `0` and a missing key as the same zero
//! value. To write a document back the way it came in, every decoded object
//! remembers which keys it had and the raw form of each key holding a zero
//! value. On encode, zero-valued keys the source never had are dropped again
//! and zero values are put back in their original form. A key whose typed
//! value has been changed to something non-zero is left alone.
//!
//! License: MIT OR Apache-2.0

use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// True for `null`, `false`, `0`, `""`, `[]` and objects holding only zero values.
pub fn is_zero_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.values().all(is_zero_value),
    }
}

#[derive(Debug, Clone)]
struct Captured {
    keys: BTreeSet<String>,
    zeros: BTreeMap<String, Value>,
}

/// How a decoded JSON object looked. Empty for values built in code, in which
/// case encoding uses the model's own omission rules unchanged.
///
/// Source bookkeeping never takes part in equality.
#[derive(Debug, Clone, Default)]
pub struct SourceShape(Option<Captured>);

impl SourceShape {
    pub fn capture(source: &Map<String, Value>) -> Self {
        let zeros = source
            .iter()
            .filter(|(_, value)| is_zero_value(value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        SourceShape(Some(Captured {
            keys: source.keys().cloned().collect(),
            zeros,
        }))
    }

    pub fn is_captured(&self) -> bool {
        self.0.is_some()
    }

    /// Rewrites `out`, the serialized form of the same value, to match the source.
    pub fn restore(&self, out: &mut Map<String, Value>) {
        let Some(captured) = &self.0 else {
            return;
        };
        out.retain(|key, value| captured.keys.contains(key) || !is_zero_value(value));
        for (key, original) in &captured.zeros {
            let unchanged = match out.get(key) {
                Some(current) => is_zero_value(current),
                None => true,
            };
            if unchanged {
                out.insert(key.clone(), original.clone());
            }
        }
    }
}

impl PartialEq for SourceShape {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for SourceShape {}

/// A model type that can record and reproduce its source shape, including
/// that of the aggregates nested inside it.
pub trait Shaped {
    fn capture(&mut self, source: &Map<String, Value>);
    fn restore(&self, out: &mut Map<String, Value>);
}
