//! Redaction events and the sinks that receive them.
//!
//! The sanitizer reports every removed header and every scrubbed cookie,
//! including the original value. Masking that value in diagnostics is the
//! caller's decision; [`redact_value`] is provided for that.

use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which half of the exchange a redaction happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Request,
    Response,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Request => write!(f, "Request"),
            Side::Response => write!(f, "Response"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedactionKind {
    HeaderRemoved,
    CookieScrubbed,
}

/// A single redaction performed by the sanitizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionEvent {
    pub entry_index: usize,
    pub side: Side,
    pub kind: RedactionKind,
    pub name: String,
    pub original_value: String,
}

impl fmt::Display for RedactionEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            RedactionKind::HeaderRemoved => write!(
                f,
                "Unsafe header found in {}, removing: {} = {}",
                self.side, self.name, self.original_value
            ),
            RedactionKind::CookieScrubbed => write!(
                f,
                "Unsafe cookie found in {}, sanitizing: {} = {}",
                self.side, self.name, self.original_value
            ),
        }
    }
}

/// Receives one call per redaction, in document order.
pub trait RedactionSink {
    fn record(&mut self, event: RedactionEvent);
}

/// Collects events in memory.
impl RedactionSink for Vec<RedactionEvent> {
    fn record(&mut self, event: RedactionEvent) {
        self.push(event);
    }
}

/// Writes each event as one `info` line through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl RedactionSink for LogSink {
    fn record(&mut self, event: RedactionEvent) {
        info!("entry {}: {}", event.entry_index, event);
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RedactionSink for NullSink {
    fn record(&mut self, _event: RedactionEvent) {}
}

/// Masks a sensitive value for display, keeping only its length when long.
pub fn redact_value(s: &str) -> String {
    const MAX_LEN: usize = 8;
    let len = s.chars().count();
    if len <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_value_short_string() {
        assert_eq!(redact_value("abc"), "[REDACTED]");
    }

    #[test]
    fn redact_value_long_string() {
        assert_eq!(redact_value("123456789"), "[REDACTED: 9 chars]");
    }

    #[test]
    fn event_display_names_field_and_value() {
        let event = RedactionEvent {
            entry_index: 0,
            side: Side::Response,
            kind: RedactionKind::CookieScrubbed,
            name: "sid".to_string(),
            original_value: "abc".to_string(),
        };
        assert_eq!(
            event.to_string(),
            "Unsafe cookie found in Response, sanitizing: sid = abc"
        );
    }

    #[test]
    fn vec_sink_collects_in_order() {
        let mut sink: Vec<RedactionEvent> = Vec::new();
        for name in ["a", "b"] {
            sink.record(RedactionEvent {
                entry_index: 1,
                side: Side::Request,
                kind: RedactionKind::HeaderRemoved,
                name: name.to_string(),
                original_value: String::new(),
            });
        }
        let names: Vec<_> = sink.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
