// harsan-core/src/lib.rs
//! # harsan Core Library
//!
//! `harsan-core` sanitizes HAR (HTTP Archive) recordings before they are
//! shared. It strips sensitive headers, scrubs session cookie values and
//! preserves every field it does not understand.
//!
//! The library is pure: it consumes and produces byte buffers and never touches
//! the filesystem, except for [`SanitizerConfig::load_from_file`].
//!
//! ## Modules
//!
//! * `har`: the typed document model.
//! * `codec`: two-pass decode / merge-encode of entries and whole documents.
//! * `shape`: source-shape records that let `null` and empty values round-trip.
//! * `sanitizer`: header removal and cookie scrubbing.
//! * `redaction`: redaction events and the sinks that receive them.
//! * `differ`: path-addressed structural comparison of untyped trees.
//! * `config`: built-in name lists and the injectable `SanitizerConfig`.
//! * `errors`: the `HarError` type.
//!
//! ## Usage Example
//!
//! ```rust
//! use harsan_core::{decode_har, encode_har, LogSink, Sanitizer};
//!
//! fn main() -> Result<(), harsan_core::HarError> {
//!     let input = br#"{"log": {"version": "1.2", "creator": {"name": "demo", "version": "1"},
//!         "entries": [{"request": {"headers": [{"name": "Authorization", "value": "secret"}]},
//!                      "_vendor": 1}]}}"#;
//!
//!     let mut har = decode_har(input)?;
//!     let summary = Sanitizer::default().sanitize_har(&mut har, &mut LogSink);
//!     assert_eq!(summary.headers_removed, 1);
//!
//!     let output = encode_har(&har)?;
//!     assert!(!String::from_utf8_lossy(&output).contains("secret"));
//!     Ok(())
//! }
//! ```
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod codec;
pub mod config;
pub mod differ;
pub mod errors;
pub mod har;
pub mod redaction;
pub mod sanitizer;
pub mod shape;

pub use codec::{decode_entry, decode_har, encode_entry, encode_har, parse_value, to_value, KNOWN_ENTRY_FIELDS};

pub use config::{
    merge_config,
    SanitizerConfig,
    ScrubStrategy,
    SANITIZED_VALUE,
    SENSITIVE_HEADERS,
    SESSION_COOKIES,
};

pub use differ::{compare, verify_round_trip, DiffOptions, Differ, Mismatch, MismatchKind};

pub use errors::HarError;

pub use har::{
    Cache, CacheInfo, Content, Cookie, Creator, Entry, ExtraFields, Har, Header, Log, Page,
    PageTimings, PostData, QueryParam, Request, Response, Timings,
};

pub use redaction::{redact_value, LogSink, NullSink, RedactionEvent, RedactionKind, RedactionSink, Side};

pub use sanitizer::{is_session_cookie, SanitizeSummary, Sanitizer};

pub use shape::{Shaped, SourceShape};
