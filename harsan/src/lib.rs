// harsan/src/lib.rs
//! # harsan CLI Application
//!
//! Command-line front end for `harsan-core`. This crate owns everything the
//! core deliberately leaves out: argument parsing, file I/O, exit codes,
//! colored console output and logger setup.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;

pub use commands::sanitize::{run_sanitize, SanitizeOptions, SanitizeOutcome};
