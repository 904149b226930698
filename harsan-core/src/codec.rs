//! codec.rs - Round-trip decode/encode for HAR documents.
//!
//! An entry is decoded in two passes: the raw object is parsed into an untyped
//! map first, then each known key is pulled out and coerced into its typed
//! field. Whatever is left over lands in `Entry::unknown_fields` untouched.
//! Encoding reverses this by serializing the typed part and merging the bag
//! back over it, so vendor-specific keys (`_fromCache`, `_webSocketMessages`,
//! ...) pass through without the model having to know about them.
//!
//! Every decoded object also records its source shape (see [`crate::shape`]),
//! so a `null`, an empty string or a zero that the typed model reads as its
//! default is written back exactly as it was read.
//!
//! Key order in the output follows `serde_json`'s map ordering, not the input.
//!
//! License: MIT OR Apache-2.0

use log::debug;
use serde::de::DeserializeOwned;
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::errors::HarError;
use crate::har::{Cache, Entry, Har, Request, Response, Timings};
use crate::shape::{Shaped, SourceShape};

/// Top-level entry keys that map onto typed `Entry` attributes.
pub const KNOWN_ENTRY_FIELDS: &[&str] = &[
    "pageref",
    "startedDateTime",
    "time",
    "request",
    "response",
    "cache",
    "timings",
    "serverIPAddress",
    "_initiator",
    "_priority",
    "_resourceType",
    "connection",
];

/// Borrowed view of the typed half of an entry, used only for serialization.
#[derive(Serialize)]
struct KnownEntryFields<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    pageref: &'a str,
    #[serde(rename = "startedDateTime")]
    started_date_time: &'a str,
    time: f64,
    request: &'a Request,
    response: &'a Response,
    cache: &'a Cache,
    timings: &'a Timings,
    #[serde(rename = "serverIPAddress", skip_serializing_if = "str::is_empty")]
    server_ip_address: &'a str,
    #[serde(rename = "_initiator", skip_serializing_if = "Option::is_none")]
    initiator: Option<&'a Map<String, Value>>,
    #[serde(rename = "_priority")]
    priority: &'a str,
    #[serde(rename = "_resourceType")]
    resource_type: &'a str,
    connection: &'a str,
}

/// Moves `key` out of `fields` and coerces the subtree into `T`.
///
/// A missing key or an explicit `null` yields `None`; a subtree of the wrong
/// shape is a hard error naming the field.
fn take_typed<T>(fields: &mut Map<String, Value>, key: &str) -> Result<Option<T>, HarError>
where
    T: for<'de> Deserialize<'de>,
{
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(subtree) => serde_json::from_value(subtree)
            .map(Some)
            .map_err(|source| HarError::FieldDecode {
                field: key.to_string(),
                source,
            }),
    }
}

/// Like [`take_typed`] for model aggregates, recording the subtree's shape.
fn take_shaped<T>(fields: &mut Map<String, Value>, key: &str) -> Result<T, HarError>
where
    T: DeserializeOwned + Default + Shaped,
{
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(subtree) => {
            let mut value = T::deserialize(&subtree).map_err(|source| HarError::FieldDecode {
                field: key.to_string(),
                source,
            })?;
            if let Value::Object(map) = &subtree {
                value.capture(map);
            }
            Ok(value)
        }
    }
}

fn restore_child(fields: &mut Map<String, Value>, key: &str, child: &impl Shaped) {
    if let Some(Value::Object(map)) = fields.get_mut(key) {
        child.restore(map);
    }
}

/// Moves `key` out of `fields` if it is a string; any other shape is dropped.
fn take_lenient_string(fields: &mut Map<String, Value>, key: &str) -> String {
    match fields.remove(key) {
        Some(Value::String(s)) => s,
        _ => String::new(),
    }
}

impl Entry {
    /// Builds an entry from an already-parsed JSON object.
    pub fn from_fields(mut fields: Map<String, Value>) -> Result<Self, HarError> {
        let shape = SourceShape::capture(&fields);
        let mut entry = Entry {
            pageref: take_lenient_string(&mut fields, "pageref"),
            started_date_time: take_lenient_string(&mut fields, "startedDateTime"),
            time: fields.remove("time").and_then(|v| v.as_f64()).unwrap_or_default(),
            shape,
            ..Default::default()
        };

        entry.request = take_shaped(&mut fields, "request")?;
        entry.response = take_shaped(&mut fields, "response")?;
        entry.cache = take_shaped(&mut fields, "cache")?;
        entry.timings = take_shaped(&mut fields, "timings")?;
        entry.server_ip_address = take_typed(&mut fields, "serverIPAddress")?.unwrap_or_default();
        entry.initiator = take_typed(&mut fields, "_initiator")?;
        entry.priority = take_typed(&mut fields, "_priority")?.unwrap_or_default();
        entry.resource_type = take_typed(&mut fields, "_resourceType")?.unwrap_or_default();
        entry.connection = take_typed(&mut fields, "connection")?.unwrap_or_default();

        // Every known key has been removed above, so what remains is unknown.
        entry.unknown_fields = fields.into_iter().collect();
        Ok(entry)
    }

    /// Serializes the entry into a single JSON object.
    ///
    /// Unknown fields are merged last; on a key collision the bag value wins.
    /// The source shape is applied after the merge.
    pub fn to_fields(&self) -> Result<Map<String, Value>, HarError> {
        let known = KnownEntryFields {
            pageref: &self.pageref,
            started_date_time: &self.started_date_time,
            time: self.time,
            request: &self.request,
            response: &self.response,
            cache: &self.cache,
            timings: &self.timings,
            server_ip_address: &self.server_ip_address,
            initiator: self.initiator.as_ref(),
            priority: &self.priority,
            resource_type: &self.resource_type,
            connection: &self.connection,
        };

        let mut merged = match serde_json::to_value(known).map_err(HarError::Encode)? {
            Value::Object(map) => map,
            other => {
                return Err(HarError::Encode(ser::Error::custom(format!(
                    "entry serialized to a non-object value: {}",
                    other
                ))))
            }
        };

        for (key, value) in &self.unknown_fields {
            merged.insert(key.clone(), value.clone());
        }

        restore_child(&mut merged, "request", &self.request);
        restore_child(&mut merged, "response", &self.response);
        restore_child(&mut merged, "cache", &self.cache);
        restore_child(&mut merged, "timings", &self.timings);
        self.shape.restore(&mut merged);
        Ok(merged)
    }
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        Entry::from_fields(fields).map_err(de::Error::custom)
    }
}

impl Serialize for Entry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_fields()
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

/// Decodes a single entry object.
pub fn decode_entry(bytes: &[u8]) -> Result<Entry, HarError> {
    let fields: Map<String, Value> = serde_json::from_slice(bytes).map_err(HarError::Decode)?;
    Entry::from_fields(fields)
}

/// Encodes a single entry object (compact form).
pub fn encode_entry(entry: &Entry) -> Result<Vec<u8>, HarError> {
    let fields = entry.to_fields()?;
    serde_json::to_vec(&fields).map_err(HarError::Encode)
}

/// Decodes entries one by one to find the field a failed document decode
/// tripped over, which serde's own error type cannot carry.
fn entry_field_error(source: &Value) -> Option<HarError> {
    source
        .pointer("/log/entries")?
        .as_array()?
        .iter()
        .find_map(|entry| match entry {
            Value::Object(fields) => Entry::from_fields(fields.clone()).err(),
            _ => None,
        })
}

/// Decodes a whole HAR document.
///
/// A mis-shaped entry field fails with [`HarError::FieldDecode`] naming it;
/// anything else that does not fit the model fails with [`HarError::Decode`].
pub fn decode_har(bytes: &[u8]) -> Result<Har, HarError> {
    let source = parse_value(bytes)?;
    let mut har = match Har::deserialize(&source) {
        Ok(har) => har,
        Err(err) => return Err(entry_field_error(&source).unwrap_or(HarError::Decode(err))),
    };
    if let Value::Object(map) = &source {
        har.capture(map);
    }
    debug!(
        "Decoded HAR document: {} pages, {} entries.",
        har.log.pages.len(),
        har.log.entries.len()
    );
    Ok(har)
}

/// Encodes a whole HAR document, pretty-printed with two-space indentation.
pub fn encode_har(har: &Har) -> Result<Vec<u8>, HarError> {
    let value = to_value(har)?;
    let mut bytes = serde_json::to_vec_pretty(&value).map_err(HarError::Encode)?;
    bytes.push(b'\n');
    debug!("Encoded HAR document: {} bytes.", bytes.len());
    Ok(bytes)
}

/// Parses raw bytes into an untyped tree, for use with the differ.
pub fn parse_value(bytes: &[u8]) -> Result<Value, HarError> {
    serde_json::from_slice(bytes).map_err(HarError::Decode)
}

/// Converts a typed document into the untyped tree [`encode_har`] writes,
/// with the source shape of every decoded object applied.
pub fn to_value(har: &Har) -> Result<Value, HarError> {
    let mut value = serde_json::to_value(har).map_err(HarError::Encode)?;
    if let Value::Object(map) = &mut value {
        har.restore(map);
    }
    Ok(value)
}
