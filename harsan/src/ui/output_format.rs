//! Themed console output helpers.
//!
//! Every helper takes the writer explicitly and a `supports_color` flag so the
//! same code path serves terminals, pipes and tests.

use anyhow::Result;
use owo_colors::OwoColorize;
use std::io::Write;

use harsan_core::{Mismatch, SanitizeSummary};

use crate::ui::theme::{ThemeEntry, ThemeMap};

/// Applies the theme color for `entry` to `text`, if color is enabled.
pub fn paint(text: &str, entry: ThemeEntry, theme: &ThemeMap, supports_color: bool) -> String {
    if !supports_color {
        return text.to_string();
    }
    match theme.get(&entry).and_then(|style| style.fg.as_ref()) {
        Some(color) => text.color(color.to_ansi_color()).to_string(),
        None => text.to_string(),
    }
}

fn print_line<W: Write>(
    writer: &mut W,
    msg: &str,
    entry: ThemeEntry,
    theme: &ThemeMap,
    supports_color: bool,
) -> Result<()> {
    writeln!(writer, "{}", paint(msg, entry, theme, supports_color))?;
    Ok(())
}

pub fn print_info_message<W: Write>(writer: &mut W, msg: &str, theme: &ThemeMap, supports_color: bool) -> Result<()> {
    print_line(writer, msg, ThemeEntry::Info, theme, supports_color)
}

pub fn print_success_message<W: Write>(writer: &mut W, msg: &str, theme: &ThemeMap, supports_color: bool) -> Result<()> {
    print_line(writer, msg, ThemeEntry::Success, theme, supports_color)
}

pub fn print_warn_message<W: Write>(writer: &mut W, msg: &str, theme: &ThemeMap, supports_color: bool) -> Result<()> {
    print_line(writer, &format!("Warning: {}", msg), ThemeEntry::Warn, theme, supports_color)
}

pub fn print_error_message<W: Write>(writer: &mut W, msg: &str, theme: &ThemeMap, supports_color: bool) -> Result<()> {
    print_line(writer, &format!("Error: {}", msg), ThemeEntry::Error, theme, supports_color)
}

/// Prints the per-run redaction counts.
pub fn print_summary<W: Write>(
    summary: &SanitizeSummary,
    writer: &mut W,
    theme: &ThemeMap,
    supports_color: bool,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", paint("Redaction Summary:", ThemeEntry::Header, theme, supports_color))?;
    for (label, count) in [
        ("Entries processed", summary.entries),
        ("Headers removed", summary.headers_removed),
        ("Cookies scrubbed", summary.cookies_scrubbed),
    ] {
        writeln!(
            writer,
            "  {}: {}",
            paint(label, ThemeEntry::SummaryLabel, theme, supports_color),
            paint(&count.to_string(), ThemeEntry::SummaryCount, theme, supports_color),
        )?;
    }
    Ok(())
}

/// Prints one line per mismatch, path highlighted.
pub fn print_mismatches<W: Write>(
    mismatches: &[Mismatch],
    writer: &mut W,
    theme: &ThemeMap,
    supports_color: bool,
) -> Result<()> {
    for mismatch in mismatches {
        let rendered = mismatch.to_string();
        let detail = rendered
            .strip_prefix(mismatch.path.as_str())
            .unwrap_or(rendered.as_str());
        writeln!(
            writer,
            "{}{}",
            paint(&mismatch.path, ThemeEntry::DiffPath, theme, supports_color),
            detail
        )?;
    }
    Ok(())
}
