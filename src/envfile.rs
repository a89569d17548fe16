//! Flat key=value credential artifacts (`.env` files).
//!
//! The gateway server reads its secret from such a file at process start;
//! this module only writes entries and never validates the secret itself.
//! An upsert replaces the existing entry for the key in place, so the most
//! recently written value is always the one a later consumer reads.

use crate::error::SetupError;
use std::path::Path;

/// Write a single `KEY=value` entry, replacing any existing entry for the
/// same key and preserving every other line (including comments).
pub fn upsert(path: &Path, key: &str, value: &str) -> Result<(), SetupError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SetupError::file_write(path, e))?;
    }

    let existing = std::fs::read_to_string(path).unwrap_or_default();
    let entry = format!("{}={}", key, value);

    let mut lines: Vec<String> = Vec::new();
    let mut replaced = false;
    for line in existing.lines() {
        if is_entry_for(line, key) {
            if !replaced {
                lines.push(entry.clone());
                replaced = true;
            }
            // Duplicate entries for the key collapse into the fresh one
        } else {
            lines.push(line.to_string());
        }
    }
    if !replaced {
        lines.push(entry);
    }

    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(path, content).map_err(|e| SetupError::file_write(path, e))
}

/// Read the current value for `key`, if the file and entry exist.
pub fn get(path: &Path, key: &str) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    content
        .lines()
        .find(|line| is_entry_for(line, key))
        .and_then(|line| line.splitn(2, '=').nth(1))
        .map(|v| v.trim().to_string())
}

fn is_entry_for(line: &str, key: &str) -> bool {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        return false;
    }
    match trimmed.split_once('=') {
        Some((k, _)) => k.trim() == key,
        None => false,
    }
}
