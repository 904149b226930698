//! Console presentation: theme handling and formatted output.

pub mod output_format;
pub mod theme;
