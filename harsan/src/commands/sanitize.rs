//! `sanitize` command: decode, sanitize, re-encode and write a HAR file.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use harsan_core::{
    decode_har, encode_har, merge_config, redact_value, RedactionEvent, RedactionKind,
    RedactionSink, SanitizeSummary, Sanitizer, SanitizerConfig, ScrubStrategy,
};

use crate::ui::output_format;
use crate::ui::theme::{ThemeEntry, ThemeMap};

/// Options for [`run_sanitize`].
#[derive(Debug, Clone, Default)]
pub struct SanitizeOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub mask: bool,
    pub case_insensitive_headers: bool,
    pub hide_values: bool,
    pub no_summary: bool,
    pub quiet: bool,
}

/// What a sanitize run produced.
#[derive(Debug, Clone)]
pub struct SanitizeOutcome {
    pub output_path: PathBuf,
    pub summary: SanitizeSummary,
}

/// Prints one themed line per redaction event.
pub struct ConsoleSink<'a, W: Write> {
    writer: W,
    theme: &'a ThemeMap,
    supports_color: bool,
    hide_values: bool,
}

impl<'a, W: Write> ConsoleSink<'a, W> {
    pub fn new(writer: W, theme: &'a ThemeMap, supports_color: bool, hide_values: bool) -> Self {
        Self {
            writer,
            theme,
            supports_color,
            hide_values,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RedactionSink for ConsoleSink<'_, W> {
    fn record(&mut self, event: RedactionEvent) {
        let action = match event.kind {
            RedactionKind::HeaderRemoved => format!("Unsafe header found in {}, removing:", event.side),
            RedactionKind::CookieScrubbed => format!("Unsafe cookie found in {}, sanitizing:", event.side),
        };
        let value = if self.hide_values {
            redact_value(&event.original_value)
        } else {
            event.original_value
        };
        let _ = writeln!(
            self.writer,
            "{} {} = {}",
            action,
            output_format::paint(&event.name, ThemeEntry::RedactedName, self.theme, self.supports_color),
            output_format::paint(&value, ThemeEntry::RedactedValue, self.theme, self.supports_color),
        );
    }
}

/// `sanitized_<name>` in the same directory as the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.har".to_string());
    input.with_file_name(format!("sanitized_{}", file_name))
}

/// Builds the effective sanitizer config from defaults, file and flags.
pub fn build_config(opts: &SanitizeOptions) -> Result<SanitizerConfig> {
    let user_config = match &opts.config {
        Some(path) => Some(
            SanitizerConfig::load_from_file(path)
                .with_context(|| format!("Failed to load sanitizer config {}", path.display()))?,
        ),
        None => None,
    };
    let mut config = merge_config(SanitizerConfig::default(), user_config);
    if opts.mask {
        config.scrub = ScrubStrategy::Mask;
    }
    if opts.case_insensitive_headers {
        config.case_insensitive_headers = true;
    }
    Ok(config)
}

/// Runs a full sanitize pass and writes the output file.
pub fn run_sanitize(opts: &SanitizeOptions, theme: &ThemeMap) -> Result<SanitizeOutcome> {
    info!("Starting sanitize of {}.", opts.input.display());
    let bytes = fs::read(&opts.input)
        .with_context(|| format!("Error reading file {}", opts.input.display()))?;

    let mut har = decode_har(&bytes)
        .with_context(|| format!("Error parsing HAR file {}", opts.input.display()))?;

    let sanitizer = Sanitizer::new(build_config(opts)?);
    debug!("Effective sanitizer config: {:?}", sanitizer.config());

    let summary = if opts.quiet {
        sanitizer.sanitize_har(&mut har, &mut harsan_core::NullSink)
    } else {
        let stdout = io::stdout();
        let supports_color = stdout.is_terminal();
        let mut sink = ConsoleSink::new(stdout.lock(), theme, supports_color, opts.hide_values);
        sanitizer.sanitize_har(&mut har, &mut sink)
    };

    let encoded = encode_har(&har).context("Error serializing sanitized HAR")?;
    let output_path = opts
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&opts.input));
    fs::write(&output_path, encoded)
        .with_context(|| format!("Error writing file {}", output_path.display()))?;

    if !opts.no_summary && !opts.quiet {
        let stderr_supports_color = io::stderr().is_terminal();
        output_format::print_summary(&summary, &mut io::stderr(), theme, stderr_supports_color)?;
    }

    info!("Sanitize completed: {} redactions.", summary.total_redactions());
    Ok(SanitizeOutcome {
        output_path,
        summary,
    })
}
