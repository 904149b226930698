//! errors.rs - Custom error types for the harsan-core library.
//!
//! Decoding is permissive for a handful of scalar entry fields, but anything that
//! cannot be parsed as structured data at all surfaces here so the caller can
//! report it.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// All error types produced by `harsan-core`.
///
/// Marked `#[non_exhaustive]` so new variants can be added without breaking
/// downstream matches.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HarError {
    #[error("Failed to decode HAR document: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to decode entry field '{field}': {source}")]
    FieldDecode {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode HAR document: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("An unexpected I/O error occurred: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid sanitizer configuration: {0}")]
    Config(String),
}

impl HarError {
    /// True for the decode-side variants (malformed input).
    pub fn is_decode(&self) -> bool {
        matches!(self, HarError::Decode(_) | HarError::FieldDecode { .. })
    }
}
