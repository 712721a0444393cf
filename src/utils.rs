// src/utils.rs
use anyhow::{Context, Result};
use std::path::Path;

/// Truncate a string to at most `max` characters, safely for UTF-8.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    s.chars().take(max).collect()
}

/// Split a comma-separated skill list, dropping empty entries.
pub fn parse_skill_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Load resume or job-description text from a plain-text file.
///
/// PDF input was only ever a best-effort extra in this tool; rejecting it
/// with a pointer beats a garbled byte dump.
pub fn load_text_file(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    if extension.as_deref() == Some("pdf") {
        anyhow::bail!(
            "PDF input is not supported: {}. Export the document to plain text first.",
            path.display()
        );
    }

    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}
