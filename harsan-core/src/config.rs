//! Configuration management for `harsan-core`.
//!
//! The built-in header and cookie lists are exposed as constants, and
//! [`SanitizerConfig`] wraps them so callers (and tests) can substitute or
//! extend the lists without touching the sanitizer itself. User overrides are
//! loaded from YAML and merged on top of the defaults.
//!
//! License: MIT OR Apache-2.0

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::errors::HarError;

/// Header names removed from every request and response.
///
/// Matching is exact: both common capitalizations are listed instead of
/// folding case.
pub const SENSITIVE_HEADERS: &[&str] = &[
    "Authorization",
    "authorization",
    "Cookie",
    "cookie",
    "Set-Cookie",
    "set-cookie",
];

/// Cookie names presumed to carry a session or auth token.
pub const SESSION_COOKIES: &[&str] = &[
    "SESSIONID",
    "JSESSIONID",
    "ASP.NET_SessionId",
    "okta-oauth-nonce",
    "oktaStateToken",
    "okta-oauth-state",
    "srefresh",
    "sid",
];

/// Replacement written over session cookie values by [`ScrubStrategy::Sentinel`].
pub const SANITIZED_VALUE: &str = "SANITIZED";

/// How a session cookie's value is rewritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrubStrategy {
    /// Replace the value with [`SANITIZED_VALUE`].
    #[default]
    Sentinel,
    /// Replace every character with `X`, keeping the original length.
    Mask,
}

impl ScrubStrategy {
    pub fn apply(&self, value: &str) -> String {
        match self {
            ScrubStrategy::Sentinel => SANITIZED_VALUE.to_string(),
            ScrubStrategy::Mask => "X".repeat(value.chars().count()),
        }
    }
}

/// The set of rules the sanitizer applies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Header names to drop from request and response header lists.
    pub sensitive_headers: Vec<String>,
    /// Cookie names whose values are scrubbed.
    pub session_cookies: Vec<String>,
    /// How scrubbed cookie values are rewritten.
    pub scrub: ScrubStrategy,
    /// Match header names ignoring ASCII case. Off by default, so that
    /// `AUTHORIZATION` passes through unless this is set.
    pub case_insensitive_headers: bool,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            sensitive_headers: SENSITIVE_HEADERS.iter().map(|s| s.to_string()).collect(),
            session_cookies: SESSION_COOKIES.iter().map(|s| s.to_string()).collect(),
            scrub: ScrubStrategy::default(),
            case_insensitive_headers: false,
        }
    }
}

impl SanitizerConfig {
    /// A config with empty lists, useful as a base for fully custom rules.
    pub fn empty() -> Self {
        Self {
            sensitive_headers: Vec::new(),
            session_cookies: Vec::new(),
            scrub: ScrubStrategy::default(),
            case_insensitive_headers: false,
        }
    }

    /// Loads a sanitizer config from a YAML file.
    ///
    /// Missing keys take their defaults, so a file containing only
    /// `session_cookies: [...]` replaces just that list.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, HarError> {
        let path = path.as_ref();
        info!("Loading sanitizer config from: {}", path.display());
        let text = std::fs::read_to_string(path)?;
        let config: SanitizerConfig = serde_yml::from_str(&text).map_err(|e| {
            HarError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;

        config.validate()?;
        info!(
            "Loaded {} sensitive headers and {} session cookies from {}.",
            config.sensitive_headers.len(),
            config.session_cookies.len(),
            path.display()
        );
        Ok(config)
    }

    /// Rejects empty names; warns about duplicates.
    pub fn validate(&self) -> Result<(), HarError> {
        let mut errors = Vec::new();
        for (list_name, list) in [
            ("sensitive_headers", &self.sensitive_headers),
            ("session_cookies", &self.session_cookies),
        ] {
            let mut seen = HashSet::new();
            for name in list {
                if name.trim().is_empty() {
                    errors.push(format!("`{}` contains an empty name.", list_name));
                } else if !seen.insert(name.as_str()) {
                    warn!("Duplicate name '{}' in `{}`.", name, list_name);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(HarError::Config(format!(
                "Config validation failed:\n{}",
                errors.join("\n")
            )))
        }
    }

    pub fn is_sensitive_header(&self, name: &str) -> bool {
        if self.case_insensitive_headers {
            self.sensitive_headers
                .iter()
                .any(|h| h.eq_ignore_ascii_case(name))
        } else {
            self.sensitive_headers.iter().any(|h| h == name)
        }
    }

    pub fn is_session_cookie(&self, name: &str) -> bool {
        self.session_cookies.iter().any(|c| c == name)
    }
}

/// Merges a user config into the defaults.
///
/// Name lists are unioned (defaults first, order preserved, duplicates
/// dropped); the user's scrub strategy and case flag replace the defaults.
pub fn merge_config(default_config: SanitizerConfig, user_config: Option<SanitizerConfig>) -> SanitizerConfig {
    let Some(user) = user_config else {
        debug!("No user config provided; using defaults.");
        return default_config;
    };

    fn union(mut base: Vec<String>, extra: Vec<String>) -> Vec<String> {
        for name in extra {
            if !base.contains(&name) {
                base.push(name);
            }
        }
        base
    }

    let merged = SanitizerConfig {
        sensitive_headers: union(default_config.sensitive_headers, user.sensitive_headers),
        session_cookies: union(default_config.session_cookies, user.session_cookies),
        scrub: user.scrub,
        case_insensitive_headers: user.case_insensitive_headers,
    };
    debug!(
        "Merged config: {} sensitive headers, {} session cookies.",
        merged.sensitive_headers.len(),
        merged.session_cookies.len()
    );
    merged
}
