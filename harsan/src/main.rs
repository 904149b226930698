// harsan/src/main.rs
//! harsan entry point.
//!
//! Exit codes: 0 on success, 1 when `compare`/`check` find differences,
//! 2 on any I/O, decode or configuration error.

use anyhow::Result;
use clap::Parser;
use is_terminal::IsTerminal;
use log::LevelFilter;
use std::io;
use std::process::ExitCode;

use harsan::cli::{Cli, Commands};
use harsan::commands::{check::run_check, compare::run_compare, error_msg, info_msg, warn_msg};
use harsan::logger;
use harsan::ui::output_format;
use harsan::ui::theme::{build_theme_map, ThemeMap, ThemeStyle};
use harsan::{run_sanitize, SanitizeOptions};
use harsan_core::{DiffOptions, Mismatch};

const EXIT_DIFFERENCES: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.quiet {
        logger::init_logger(Some(LevelFilter::Off));
    } else if cli.debug {
        logger::init_logger(Some(LevelFilter::Debug));
    } else {
        logger::init_logger(None);
    }

    let theme_map = match build_theme_map(cli.theme.as_ref()) {
        Ok(theme) => theme,
        Err(e) => {
            let fallback = ThemeStyle::default_theme_map();
            warn_msg(format!("{:#}; using the default theme.", e), &fallback);
            fallback
        }
    };

    match run(cli, &theme_map) {
        Ok(code) => code,
        Err(e) => {
            error_msg(format!("{:#}", e), &theme_map);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: Cli, theme_map: &ThemeMap) -> Result<ExitCode> {
    match cli.command {
        Commands::Sanitize(cmd) => {
            let opts = SanitizeOptions {
                input: cmd.input,
                output: cmd.output,
                config: cmd.config,
                mask: cmd.mask,
                case_insensitive_headers: cmd.case_insensitive_headers,
                hide_values: cmd.hide_values,
                no_summary: cmd.no_summary,
                quiet: cli.quiet,
            };
            let outcome = run_sanitize(&opts, theme_map)?;
            let stdout = io::stdout();
            let supports_color = stdout.is_terminal();
            output_format::print_success_message(
                &mut stdout.lock(),
                &format!("Sanitized HAR file has been saved as: {}", outcome.output_path.display()),
                theme_map,
                supports_color,
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Compare(cmd) => {
            let mismatches = run_compare(&cmd.left, &cmd.right, DiffOptions { symmetric: cmd.symmetric })?;
            report(&mismatches, "No differences found.", theme_map)
        }
        Commands::Check(cmd) => {
            let mismatches = run_check(&cmd.input)?;
            report(&mismatches, "Round trip is lossless.", theme_map)
        }
    }
}

fn report(mismatches: &[Mismatch], clean_message: &str, theme_map: &ThemeMap) -> Result<ExitCode> {
    let stdout = io::stdout();
    let supports_color = stdout.is_terminal();
    let mut writer = stdout.lock();

    if mismatches.is_empty() {
        output_format::print_success_message(&mut writer, clean_message, theme_map, supports_color)?;
        return Ok(ExitCode::SUCCESS);
    }

    output_format::print_mismatches(mismatches, &mut writer, theme_map, supports_color)?;
    info_msg(format!("{} difference(s) found.", mismatches.len()), theme_map);
    Ok(ExitCode::from(EXIT_DIFFERENCES))
}
