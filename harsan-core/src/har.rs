//! The HAR (HTTP Archive) document model.
//!
//! Every type here is a plain value aggregate. Nested aggregates carry a
//! flattened `extra` map so keys the model does not name still survive a
//! decode/encode cycle, and a [`SourceShape`] so `null`, empty and absent keys
//! come back out as they went in. `Entry` is special: its known/unknown split
//! is done by the explicit two-pass codec in [`crate::codec`], so it does not
//! derive the serde traits.
//!
//! License: MIT OR Apache-2.0

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::shape::{Shaped, SourceShape};

/// Untyped key/value bag used for every field the model does not name.
pub type ExtraFields = BTreeMap<String, Value>;

/// Treats an explicit JSON `null` the same as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

/// The whole recording.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Har {
    #[serde(default, deserialize_with = "null_as_default")]
    pub log: Log,
    #[serde(flatten)]
    pub extra: ExtraFields,
    #[serde(skip)]
    pub shape: SourceShape,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Log {
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub creator: Creator,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub pages: Vec<Page>,
    /// Capture order is chronological and must be preserved.
    #[serde(deserialize_with = "null_as_default")]
    pub entries: Vec<Entry>,
    #[serde(flatten)]
    pub extra: ExtraFields,
    #[serde(skip)]
    pub shape: SourceShape,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Creator {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
    #[serde(skip)]
    pub shape: SourceShape,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Page {
    #[serde(deserialize_with = "null_as_default")]
    pub started_date_time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub page_timings: PageTimings,
    #[serde(flatten)]
    pub extra: ExtraFields,
    #[serde(skip)]
    pub shape: SourceShape,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageTimings {
    #[serde(deserialize_with = "null_as_default")]
    pub on_content_load: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub on_load: f64,
    #[serde(flatten)]
    pub extra: ExtraFields,
    #[serde(skip)]
    pub shape: SourceShape,
}

/// One captured request/response exchange.
///
/// `unknown_fields` holds every top-level key of the source entry that is not
/// one of the named attributes below. See [`crate::codec::KNOWN_ENTRY_FIELDS`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entry {
    pub pageref: String,
    pub started_date_time: String,
    pub time: f64,
    pub request: Request,
    pub response: Response,
    pub cache: Cache,
    pub timings: Timings,
    pub server_ip_address: String,
    pub initiator: Option<Map<String, Value>>,
    pub priority: String,
    pub resource_type: String,
    pub connection: String,
    pub unknown_fields: ExtraFields,
    /// Shape of the source object, see [`SourceShape`].
    pub shape: SourceShape,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Request {
    #[serde(deserialize_with = "null_as_default")]
    pub method: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub http_version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cookies: Vec<Cookie>,
    #[serde(deserialize_with = "null_as_default")]
    pub headers: Vec<Header>,
    #[serde(deserialize_with = "null_as_default")]
    pub query_string: Vec<QueryParam>,
    #[serde(deserialize_with = "null_as_default")]
    pub post_data: PostData,
    #[serde(deserialize_with = "null_as_default")]
    pub headers_size: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub body_size: i64,
    #[serde(flatten)]
    pub extra: ExtraFields,
    #[serde(skip)]
    pub shape: SourceShape,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Response {
    #[serde(deserialize_with = "null_as_default")]
    pub status: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub status_text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub http_version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cookies: Vec<Cookie>,
    #[serde(deserialize_with = "null_as_default")]
    pub headers: Vec<Header>,
    #[serde(deserialize_with = "null_as_default")]
    pub content: Content,
    #[serde(rename = "redirectURL", deserialize_with = "null_as_default")]
    pub redirect_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub headers_size: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub body_size: i64,
    #[serde(rename = "_transferSize", deserialize_with = "null_as_default")]
    pub transfer_size: i64,
    #[serde(
        rename = "_error",
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub error: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
    #[serde(skip)]
    pub shape: SourceShape,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Cookie {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(deserialize_with = "null_as_default")]
    pub domain: String,
    #[serde(deserialize_with = "null_as_default")]
    pub same_site: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub expires: String,
    #[serde(deserialize_with = "null_as_default")]
    pub http_only: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub secure: bool,
    #[serde(flatten)]
    pub extra: ExtraFields,
    #[serde(skip)]
    pub shape: SourceShape,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
    #[serde(skip)]
    pub shape: SourceShape,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }
}

/// A `queryString` name/value pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParam {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
    #[serde(skip)]
    pub shape: SourceShape,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostData {
    #[serde(deserialize_with = "null_as_default")]
    pub mime_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
    #[serde(skip)]
    pub shape: SourceShape,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Content {
    #[serde(deserialize_with = "null_as_default")]
    pub size: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub mime_type: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub encoding: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
    #[serde(skip)]
    pub shape: SourceShape,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Cache {
    #[serde(deserialize_with = "null_as_default")]
    pub before_request: CacheInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub after_request: CacheInfo,
    #[serde(flatten)]
    pub extra: ExtraFields,
    #[serde(skip)]
    pub shape: SourceShape,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheInfo {
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub expires: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_access: String,
    #[serde(rename = "etag", skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub etag: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hit_count: i64,
    #[serde(flatten)]
    pub extra: ExtraFields,
    #[serde(skip)]
    pub shape: SourceShape,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    #[serde(deserialize_with = "null_as_default")]
    pub blocked: f64,
    #[serde(rename = "_blocked_queueing", deserialize_with = "null_as_default")]
    pub blocked_queueing: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub dns: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub connect: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub send: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub wait: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub receive: f64,
    #[serde(skip_serializing_if = "is_zero")]
    #[serde(deserialize_with = "null_as_default")]
    pub ssl: f64,
    #[serde(flatten)]
    pub extra: ExtraFields,
    #[serde(skip)]
    pub shape: SourceShape,
}

/// Implements [`Shaped`] for a model type: `{ field: "key" }` lists nested
/// objects, `[ field: "key" ]` lists arrays of nested objects.
macro_rules! shaped {
    ($ty:ident { $($field:ident: $key:literal),* $(,)? } [ $($list:ident: $list_key:literal),* $(,)? ]) => {
        impl Shaped for $ty {
            fn capture(&mut self, source: &Map<String, Value>) {
                self.shape = SourceShape::capture(source);
                $(
                    if let Some(Value::Object(child)) = source.get($key) {
                        self.$field.capture(child);
                    }
                )*
                $(
                    if let Some(Value::Array(items)) = source.get($list_key) {
                        for (item, raw) in self.$list.iter_mut().zip(items) {
                            if let Value::Object(child) = raw {
                                item.capture(child);
                            }
                        }
                    }
                )*
            }

            fn restore(&self, out: &mut Map<String, Value>) {
                $(
                    if let Some(Value::Object(child)) = out.get_mut($key) {
                        self.$field.restore(child);
                    }
                )*
                $(
                    if let Some(Value::Array(items)) = out.get_mut($list_key) {
                        for (item, value) in self.$list.iter().zip(items.iter_mut()) {
                            if let Value::Object(child) = value {
                                item.restore(child);
                            }
                        }
                    }
                )*
                self.shape.restore(out);
            }
        }
    };
}

// Entries record and restore their own shape in the codec, so `Log` does not
// descend into them.
shaped!(Har { log: "log" } []);
shaped!(Log { creator: "creator" } [pages: "pages"]);
shaped!(Creator {} []);
shaped!(Page { page_timings: "pageTimings" } []);
shaped!(PageTimings {} []);
shaped!(Request { post_data: "postData" } [cookies: "cookies", headers: "headers", query_string: "queryString"]);
shaped!(Response { content: "content" } [cookies: "cookies", headers: "headers"]);
shaped!(Cookie {} []);
shaped!(Header {} []);
shaped!(QueryParam {} []);
shaped!(PostData {} []);
shaped!(Content {} []);
shaped!(Cache { before_request: "beforeRequest", after_request: "afterRequest" } []);
shaped!(CacheInfo {} []);
shaped!(Timings {} []);

impl Har {
    /// Iterates over every entry in capture order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.log.entries.iter()
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut Entry> {
        self.log.entries.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cookie_defaults_missing_fields() {
        let cookie: Cookie = serde_json::from_value(json!({ "name": "sid", "value": "x" })).unwrap();
        assert_eq!(cookie.name, "sid");
        assert_eq!(cookie.path, "");
        assert!(!cookie.secure);
        assert!(cookie.extra.is_empty());
    }

    #[test]
    fn nested_extra_fields_survive() {
        let header: Header = serde_json::from_value(json!({
            "name": "Accept",
            "value": "*/*",
            "comment": "kept"
        }))
        .unwrap();
        assert_eq!(header.extra.get("comment"), Some(&json!("kept")));

        let back = serde_json::to_value(&header).unwrap();
        assert_eq!(back, json!({ "name": "Accept", "value": "*/*", "comment": "kept" }));
    }

    #[test]
    fn null_nested_aggregate_is_treated_as_absent() {
        let request: Request = serde_json::from_value(json!({
            "method": "GET",
            "postData": null,
            "cookies": null
        }))
        .unwrap();
        assert_eq!(request.post_data, PostData::default());
        assert!(request.cookies.is_empty());
    }

    #[test]
    fn null_scalars_decode_to_zero_values() {
        let response: Response = serde_json::from_value(json!({
            "status": null,
            "statusText": null,
            "headersSize": null,
            "_transferSize": null,
            "redirectURL": null
        }))
        .unwrap();
        assert_eq!(response.status, 0);
        assert_eq!(response.status_text, "");
        assert_eq!(response.transfer_size, 0);

        let timings: Timings = serde_json::from_value(json!({ "wait": null, "ssl": null })).unwrap();
        assert_eq!(timings.wait, 0.0);
    }

    #[test]
    fn captured_cookie_restores_null_expires() {
        let source = json!({ "name": "a", "value": "b", "expires": null });
        let mut cookie: Cookie = serde_json::from_value(source.clone()).unwrap();
        if let Value::Object(map) = &source {
            cookie.capture(map);
        }

        let mut out = match serde_json::to_value(&cookie).unwrap() {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        };
        cookie.restore(&mut out);
        assert_eq!(Value::Object(out), source);
    }

    #[test]
    fn nested_shapes_are_restored() {
        let source = json!({
            "method": "GET",
            "postData": null,
            "cookies": [{ "name": "a", "value": "", "expires": null }],
            "headers": []
        });
        let mut request: Request = serde_json::from_value(source.clone()).unwrap();
        if let Value::Object(map) = &source {
            request.capture(map);
        }
        assert!(request.cookies[0].shape.is_captured());

        let mut out = match serde_json::to_value(&request).unwrap() {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        };
        request.restore(&mut out);
        assert_eq!(Value::Object(out), source);
    }

    #[test]
    fn empty_optional_strings_are_omitted() {
        let content = Content {
            size: 10,
            mime_type: "text/html".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&content).unwrap();
        assert!(value.get("text").is_none());
        assert!(value.get("encoding").is_none());
        assert_eq!(value["size"], json!(10));
    }

    #[test]
    fn zero_ssl_timing_is_omitted() {
        let timings = Timings {
            wait: 12.5,
            ..Default::default()
        };
        let value = serde_json::to_value(&timings).unwrap();
        assert!(value.get("ssl").is_none());
        assert_eq!(value["_blocked_queueing"], json!(0.0));
    }
}
