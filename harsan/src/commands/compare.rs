//! `compare` command: structural diff of two documents on disk.

use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::Path;

use harsan_core::{parse_value, DiffOptions, Differ, Mismatch};

fn load_tree(path: &Path) -> Result<serde_json::Value> {
    let bytes = fs::read(path).with_context(|| format!("Error reading file {}", path.display()))?;
    parse_value(&bytes).with_context(|| format!("Error parsing JSON file {}", path.display()))
}

/// Parses both files as untyped trees and returns every mismatch.
pub fn run_compare(left: &Path, right: &Path, options: DiffOptions) -> Result<Vec<Mismatch>> {
    info!("Comparing {} against {}.", left.display(), right.display());
    let left_tree = load_tree(left)?;
    let right_tree = load_tree(right)?;
    let mismatches = Differ::new(options).compare(&left_tree, &right_tree, "");
    info!("Found {} mismatches.", mismatches.len());
    Ok(mismatches)
}
