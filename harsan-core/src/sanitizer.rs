//! sanitizer.rs - Header and cookie sanitization over the typed HAR model.
//!
//! Sensitive headers are dropped from request and response header lists.
//! Session cookies stay in their lists but have their value rewritten. Nothing
//! else in the entry is touched, including anything in the unknown-field bag.
//!
//! License: MIT OR Apache-2.0

use log::debug;
use std::ops::AddAssign;

use crate::config::{SanitizerConfig, SESSION_COOKIES};
use crate::har::{Cookie, Entry, Har, Header};
use crate::redaction::{RedactionEvent, RedactionKind, RedactionSink, Side};

/// Returns true if `name` is one of the built-in session cookie names.
///
/// Exact, case-sensitive match.
pub fn is_session_cookie(name: &str) -> bool {
    SESSION_COOKIES.contains(&name)
}

/// Counts of what a sanitization pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeSummary {
    pub entries: usize,
    pub headers_removed: usize,
    pub cookies_scrubbed: usize,
}

impl SanitizeSummary {
    pub fn total_redactions(&self) -> usize {
        self.headers_removed + self.cookies_scrubbed
    }
}

impl AddAssign for SanitizeSummary {
    fn add_assign(&mut self, other: Self) {
        self.entries += other.entries;
        self.headers_removed += other.headers_removed;
        self.cookies_scrubbed += other.cookies_scrubbed;
    }
}

/// Applies a [`SanitizerConfig`] to HAR entries.
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    config: SanitizerConfig,
}

impl Sanitizer {
    pub fn new(config: SanitizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    /// Returns a new list without the sensitive headers, order preserved.
    pub fn sanitize_headers(
        &self,
        headers: &[Header],
        entry_index: usize,
        side: Side,
        sink: &mut dyn RedactionSink,
    ) -> Vec<Header> {
        let mut kept = Vec::with_capacity(headers.len());
        for header in headers {
            if self.config.is_sensitive_header(&header.name) {
                sink.record(RedactionEvent {
                    entry_index,
                    side,
                    kind: RedactionKind::HeaderRemoved,
                    name: header.name.clone(),
                    original_value: header.value.clone(),
                });
            } else {
                kept.push(header.clone());
            }
        }
        kept
    }

    /// Rewrites session cookie values in place. Returns how many were scrubbed.
    pub fn sanitize_cookies(
        &self,
        cookies: &mut [Cookie],
        entry_index: usize,
        side: Side,
        sink: &mut dyn RedactionSink,
    ) -> usize {
        let mut scrubbed = 0;
        for cookie in cookies.iter_mut().filter(|c| self.config.is_session_cookie(&c.name)) {
            let replacement = self.config.scrub.apply(&cookie.value);
            let original = std::mem::replace(&mut cookie.value, replacement);
            sink.record(RedactionEvent {
                entry_index,
                side,
                kind: RedactionKind::CookieScrubbed,
                name: cookie.name.clone(),
                original_value: original,
            });
            scrubbed += 1;
        }
        scrubbed
    }

    /// Sanitizes both header lists and both cookie lists of one entry.
    pub fn sanitize_entry(
        &self,
        entry: &mut Entry,
        entry_index: usize,
        sink: &mut dyn RedactionSink,
    ) -> SanitizeSummary {
        let mut summary = SanitizeSummary {
            entries: 1,
            ..Default::default()
        };

        let before = entry.request.headers.len() + entry.response.headers.len();
        entry.request.headers = self.sanitize_headers(&entry.request.headers, entry_index, Side::Request, sink);
        entry.response.headers = self.sanitize_headers(&entry.response.headers, entry_index, Side::Response, sink);
        summary.headers_removed = before - (entry.request.headers.len() + entry.response.headers.len());

        summary.cookies_scrubbed += self.sanitize_cookies(&mut entry.request.cookies, entry_index, Side::Request, sink);
        summary.cookies_scrubbed += self.sanitize_cookies(&mut entry.response.cookies, entry_index, Side::Response, sink);
        summary
    }

    /// Sanitizes every entry of the document, in capture order.
    pub fn sanitize_har(&self, har: &mut Har, sink: &mut dyn RedactionSink) -> SanitizeSummary {
        let mut summary = SanitizeSummary::default();
        for (index, entry) in har.entries_mut().enumerate() {
            summary += self.sanitize_entry(entry, index, sink);
        }
        debug!(
            "Sanitized {} entries: {} headers removed, {} cookies scrubbed.",
            summary.entries, summary.headers_removed, summary.cookies_scrubbed
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ScrubStrategy, SANITIZED_VALUE};
    use crate::redaction::NullSink;

    fn cookie(name: &str, value: &str) -> Cookie {
        Cookie {
            name: name.to_string(),
            value: value.to_string(),
            path: "/".to_string(),
            domain: "example.com".to_string(),
            http_only: true,
            ..Default::default()
        }
    }

    #[test]
    fn removes_listed_headers_only() {
        let sanitizer = Sanitizer::default();
        let headers = vec![Header::new("Authorization", "secret"), Header::new("X-Custom", "ok")];
        let mut events: Vec<RedactionEvent> = Vec::new();
        let kept = sanitizer.sanitize_headers(&headers, 0, Side::Request, &mut events);

        assert_eq!(kept, vec![Header::new("X-Custom", "ok")]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "Authorization");
        assert_eq!(events[0].original_value, "secret");
        assert_eq!(events[0].kind, RedactionKind::HeaderRemoved);
    }

    #[test]
    fn all_caps_header_passes_with_default_config() {
        let sanitizer = Sanitizer::default();
        let headers = vec![Header::new("AUTHORIZATION", "secret")];
        let kept = sanitizer.sanitize_headers(&headers, 0, Side::Request, &mut NullSink);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn session_cookie_names() {
        for name in ["SESSIONID", "JSESSIONID", "ASP.NET_SessionId", "okta-oauth-nonce", "oktaStateToken", "okta-oauth-state", "srefresh", "sid"] {
            assert!(is_session_cookie(name), "{name} should be a session cookie");
        }
        assert!(!is_session_cookie("jsessionid"));
        assert!(!is_session_cookie("user_pref"));
        assert!(!is_session_cookie(SANITIZED_VALUE));
    }

    #[test]
    fn scrubs_session_cookies_and_keeps_others() {
        let sanitizer = Sanitizer::default();
        let mut cookies = vec![cookie("JSESSIONID", "abc123"), cookie("user_pref", "dark")];
        let mut events: Vec<RedactionEvent> = Vec::new();
        let scrubbed = sanitizer.sanitize_cookies(&mut cookies, 3, Side::Response, &mut events);

        assert_eq!(scrubbed, 1);
        assert_eq!(cookies[0].value, "SANITIZED");
        assert_eq!(cookies[0].path, "/");
        assert_eq!(cookies[0].domain, "example.com");
        assert!(cookies[0].http_only);
        assert_eq!(cookies[1], cookie("user_pref", "dark"));
        assert_eq!(events[0].entry_index, 3);
        assert_eq!(events[0].original_value, "abc123");
    }

    #[test]
    fn mask_strategy_keeps_length() {
        let sanitizer = Sanitizer::new(SanitizerConfig {
            scrub: ScrubStrategy::Mask,
            ..Default::default()
        });
        let mut cookies = vec![cookie("sid", "abc123")];
        sanitizer.sanitize_cookies(&mut cookies, 0, Side::Request, &mut NullSink);
        assert_eq!(cookies[0].value, "XXXXXX");
    }

    #[test]
    fn sanitize_entry_is_idempotent() {
        let sanitizer = Sanitizer::default();
        let mut entry = Entry::default();
        entry.request.headers = vec![Header::new("cookie", "sid=1"), Header::new("Accept", "*/*")];
        entry.request.cookies = vec![cookie("sid", "1")];
        entry.response.headers = vec![Header::new("set-cookie", "sid=2"), Header::new("Server", "nginx")];
        entry.response.cookies = vec![cookie("sid", "2"), cookie("theme", "dark")];

        let first = sanitizer.sanitize_entry(&mut entry, 0, &mut NullSink);
        assert_eq!(first.headers_removed, 2);
        assert_eq!(first.cookies_scrubbed, 2);
        let once = entry.clone();

        sanitizer.sanitize_entry(&mut entry, 0, &mut NullSink);
        assert_eq!(entry, once);
    }

    #[test]
    fn sanitize_har_visits_every_entry() {
        let sanitizer = Sanitizer::default();
        let mut har = Har::default();
        for _ in 0..3 {
            let mut entry = Entry::default();
            entry.request.headers = vec![Header::new("Authorization", "Bearer t")];
            har.log.entries.push(entry);
        }
        let mut events: Vec<RedactionEvent> = Vec::new();
        let summary = sanitizer.sanitize_har(&mut har, &mut events);

        assert_eq!(summary.entries, 3);
        assert_eq!(summary.headers_removed, 3);
        assert_eq!(summary.total_redactions(), 3);
        let indices: Vec<_> = events.iter().map(|e| e.entry_index).collect();
        assert_eq!(indices, [0, 1, 2]);
        assert!(har.entries().all(|e| e.request.headers.is_empty()));
    }
}
