//! differ.rs - Path-addressed structural comparison of untyped JSON trees.
//!
//! Used to check that a decode/encode (or reorder-only) pass did not silently
//! drop or alter content. It works on `serde_json::Value`, never on the typed
//! model, so it catches anything the model fails to carry.
//!
//! Key presence is checked one way by default: keys of the left tree missing
//! from the right are reported, keys only on the right are not. Set
//! [`DiffOptions::symmetric`] to report both.
//!
//! License: MIT OR Apache-2.0

use serde_json::Value;
use std::fmt;

use crate::codec;
use crate::errors::HarError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Also report keys present only in the right-hand tree.
    pub symmetric: bool,
}

/// What kind of divergence was found at a path.
#[derive(Debug, Clone, PartialEq)]
pub enum MismatchKind {
    MissingInRight,
    MissingInLeft,
    /// Exactly one side is an object.
    TypeMismatch { left: &'static str, right: &'static str },
    /// Both sides are arrays of different length. Elements are not compared.
    LengthMismatch { left: usize, right: usize },
    ValueMismatch { left: Value, right: Value },
}

/// A single divergence between the two trees.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    /// Dot-separated path, with `[i]` for array indices (`log.entries[0].time`).
    pub path: String,
    pub kind: MismatchKind,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            MismatchKind::MissingInRight => write!(f, "{}: missing in right", self.path),
            MismatchKind::MissingInLeft => write!(f, "{}: missing in left", self.path),
            MismatchKind::TypeMismatch { left, right } => {
                write!(f, "{}: type mismatch ({} vs {})", self.path, left, right)
            }
            MismatchKind::LengthMismatch { left, right } => {
                write!(f, "{}: length {} != {}", self.path, left, right)
            }
            MismatchKind::ValueMismatch { left, right } => {
                write!(f, "{}: {} != {}", self.path, left, right)
            }
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join_key(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

/// Leaf equality. Numbers compare by value, so `12` equals `12.0`.
fn leaf_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => match (l.as_f64(), r.as_f64()) {
            (Some(l), Some(r)) => l == r,
            _ => l == r,
        },
        _ => left == right,
    }
}

/// Walks two trees and collects every mismatch.
#[derive(Debug, Default)]
pub struct Differ {
    options: DiffOptions,
    mismatches: Vec<Mismatch>,
}

impl Differ {
    pub fn new(options: DiffOptions) -> Self {
        Self {
            options,
            mismatches: Vec::new(),
        }
    }

    pub fn compare(mut self, left: &Value, right: &Value, path: &str) -> Vec<Mismatch> {
        self.walk(left, right, path);
        self.mismatches
    }

    fn report(&mut self, path: String, kind: MismatchKind) {
        self.mismatches.push(Mismatch { path, kind });
    }

    fn walk(&mut self, left: &Value, right: &Value, path: &str) {
        match (left, right) {
            (Value::Object(l), Value::Object(r)) => {
                for (key, l_value) in l {
                    let child = join_key(path, key);
                    match r.get(key) {
                        Some(r_value) => self.walk(l_value, r_value, &child),
                        None => self.report(child, MismatchKind::MissingInRight),
                    }
                }
                if self.options.symmetric {
                    for key in r.keys().filter(|k| !l.contains_key(*k)) {
                        self.report(join_key(path, key), MismatchKind::MissingInLeft);
                    }
                }
            }
            (Value::Object(_), _) | (_, Value::Object(_)) => self.report(
                path.to_string(),
                MismatchKind::TypeMismatch {
                    left: type_name(left),
                    right: type_name(right),
                },
            ),
            (Value::Array(l), Value::Array(r)) => {
                if l.len() != r.len() {
                    self.report(
                        path.to_string(),
                        MismatchKind::LengthMismatch {
                            left: l.len(),
                            right: r.len(),
                        },
                    );
                    return;
                }
                for (i, (l_item, r_item)) in l.iter().zip(r).enumerate() {
                    self.walk(l_item, r_item, &format!("{}[{}]", path, i));
                }
            }
            _ => {
                if !leaf_eq(left, right) {
                    self.report(
                        path.to_string(),
                        MismatchKind::ValueMismatch {
                            left: left.clone(),
                            right: right.clone(),
                        },
                    );
                }
            }
        }
    }
}

/// Compares two trees with the default (one-directional) options.
pub fn compare(left: &Value, right: &Value, path_prefix: &str) -> Vec<Mismatch> {
    Differ::new(DiffOptions::default()).compare(left, right, path_prefix)
}

/// Decodes and re-encodes `bytes`, then diffs the original tree against the
/// result. An empty list means the round trip lost nothing.
pub fn verify_round_trip(bytes: &[u8]) -> Result<Vec<Mismatch>, HarError> {
    let original = codec::parse_value(bytes)?;
    let har = codec::decode_har(bytes)?;
    let encoded = codec::encode_har(&har)?;
    let round_tripped = codec::parse_value(&encoded)?;
    Ok(compare(&original, &round_tripped, ""))
}
