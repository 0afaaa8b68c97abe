// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Script import.
//!
//! A script is plain text with one item per non-blank line.

use crate::models::item::{Item, StyleDefaults};
use anyhow::{Context, Result};
use std::path::Path;

/// Build items from line-delimited text. Lines are trimmed, blank lines
/// dropped, and `order` counts the kept lines from 1.
pub fn import_lines(text: &str, defaults: &StyleDefaults) -> Vec<Item> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(idx, line)| Item::new(idx + 1, line.to_string(), defaults))
        .collect()
}

/// Read a UTF-8 text file and import its lines.
pub fn import_file(path: &Path, defaults: &StyleDefaults) -> Result<Vec<Item>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let items = import_lines(&text, defaults);
    log::info!("Imported {} items from {}", items.len(), path.display());
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_one_item_per_non_blank_line() {
        let items = import_lines("  first \r\n\r\nsecond\n   \nthird", &StyleDefaults::default());
        let texts: Vec<&str> = items.iter().map(|item| item.text.as_str()).collect();
        let orders: Vec<usize> = items.iter().map(|item| item.order).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn test_ids_are_unique() {
        let items = import_lines("a\nb\nc\nd", &StyleDefaults::default());
        let ids: HashSet<&str> = items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_empty_source() {
        assert!(import_lines("", &StyleDefaults::default()).is_empty());
        assert!(import_lines("\n \n\t\n", &StyleDefaults::default()).is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = import_file(Path::new("/no/such/script.txt"), &StyleDefaults::default());
        assert!(result.is_err());
    }
}
