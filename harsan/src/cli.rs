//! This file defines the command-line interface (CLI) for the harsan
//! application, including all available commands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "harsan",
    version = env!("CARGO_PKG_VERSION"),
    about = "Strip credentials and session cookies from HAR recordings",
    long_about = "harsan removes sensitive headers (Authorization, Cookie, Set-Cookie) and scrubs session cookie values in HTTP Archive (HAR) recordings so they can be shared safely. Fields it does not understand are carried through unchanged.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress per-redaction lines, the summary and logging.")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short = 'd', global = true, conflicts_with = "quiet", help = "Enable debug logging.")]
    pub debug: bool,

    /// Specify the path to a custom YAML theme file.
    #[arg(long = "theme", value_name = "FILE", global = true, help = "Specify the path to a custom YAML theme file.")]
    pub theme: Option<PathBuf>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `harsan` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sanitizes a HAR file and writes the result next to it.
    #[command(about = "Remove sensitive headers and scrub session cookies from a HAR file.")]
    Sanitize(SanitizeCommand),

    /// Structurally compares two JSON documents.
    #[command(about = "Structurally compare two HAR (or any JSON) documents and report every difference by path.")]
    Compare(CompareCommand),

    /// Verifies that decoding and re-encoding a HAR file loses nothing.
    #[command(about = "Check that a HAR file survives a decode/encode round trip without losing content.")]
    Check(CheckCommand),
}

/// Arguments for the `sanitize` command.
#[derive(Parser, Debug)]
pub struct SanitizeCommand {
    /// The HAR file to sanitize.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Write output here instead of `sanitized_<FILE>`.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to this file instead of sanitized_<FILE> next to the input.")]
    pub output: Option<PathBuf>,

    /// Extra header and cookie names (YAML), merged with the built-in lists.
    #[arg(long = "config", value_name = "FILE", help = "Path to a sanitizer configuration file (YAML), merged with the built-in lists.")]
    pub config: Option<PathBuf>,

    /// Mask cookie values with X characters instead of the SANITIZED sentinel.
    #[arg(long, help = "Replace session cookie values with X characters of the same length instead of SANITIZED.")]
    pub mask: bool,

    /// Match sensitive header names ignoring case.
    #[arg(long = "case-insensitive-headers", help = "Match sensitive header names ignoring ASCII case.")]
    pub case_insensitive_headers: bool,

    /// Do not print original values in redaction lines.
    #[arg(long = "hide-values", help = "Mask original header and cookie values in the console output.")]
    pub hide_values: bool,

    /// Suppress the redaction summary.
    #[arg(long = "no-summary", help = "Suppress the redaction summary.")]
    pub no_summary: bool,
}

/// Arguments for the `compare` command.
#[derive(Parser, Debug)]
pub struct CompareCommand {
    /// Reference document.
    #[arg(value_name = "LEFT")]
    pub left: PathBuf,

    /// Document checked against the reference.
    #[arg(value_name = "RIGHT")]
    pub right: PathBuf,

    /// Also report keys that only exist in RIGHT.
    #[arg(long, help = "Also report keys present only in RIGHT.")]
    pub symmetric: bool,
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckCommand {
    /// The HAR file to verify.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_sanitize_with_flags() {
        let cli = Cli::parse_from(["harsan", "sanitize", "in.har", "--mask", "-o", "out.har", "-q"]);
        assert!(cli.quiet);
        match cli.command {
            Commands::Sanitize(cmd) => {
                assert_eq!(cmd.input, PathBuf::from("in.har"));
                assert_eq!(cmd.output, Some(PathBuf::from("out.har")));
                assert!(cmd.mask);
                assert!(!cmd.hide_values);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
