//! `check` command: verify a HAR file survives a decode/encode round trip.

use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::Path;

use harsan_core::{verify_round_trip, Mismatch};

/// Returns every difference between the file and its re-encoded form.
pub fn run_check(input: &Path) -> Result<Vec<Mismatch>> {
    info!("Checking round trip of {}.", input.display());
    let bytes = fs::read(input).with_context(|| format!("Error reading file {}", input.display()))?;
    verify_round_trip(&bytes).with_context(|| format!("Error parsing HAR file {}", input.display()))
}
