// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background library.
//!
//! Keeps the set of background assets known to the editor, deduplicated by
//! case-insensitive file name. Paths arrive from uploads and from backend
//! listings and are merged with [`reconcile`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// File extensions offered in the background picker.
pub const ALLOWED_EXTENSIONS: [&str; 8] = ["mp4", "mov", "mkv", "webm", "jpg", "jpeg", "png", "webp"];

/// A known background asset, either a bare path or `{ "path": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LibraryEntry {
    Path(String),
    Object { path: String },
}

impl LibraryEntry {
    pub fn path(&self) -> &str {
        match self {
            LibraryEntry::Path(path) => path,
            LibraryEntry::Object { path } => path,
        }
    }

    pub fn file_name(&self) -> &str {
        file_name(self.path())
    }
}

/// Last `/`-separated segment of a path or URL.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or_default()
}

/// Case-insensitive dedupe key for a path.
pub fn file_key(path: &str) -> String {
    file_name(path).to_lowercase()
}

/// Whether the path has an extension the picker shows.
pub fn is_allowed_background(path: &str) -> bool {
    let name = file_name(path);
    match name.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Merge `paths` into `current`.
///
/// A path is appended when its file name is non-empty and not yet present;
/// duplicates within `paths` collapse to their first occurrence. When nothing
/// qualifies the returned `Arc` is the same allocation as `current`.
pub fn reconcile<S: AsRef<str>>(current: &Arc<Vec<LibraryEntry>>, paths: &[S]) -> Arc<Vec<LibraryEntry>> {
    let mut have: HashSet<String> = current.iter().map(|entry| file_key(entry.path())).collect();
    let mut added = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let key = file_key(path);
        if key.is_empty() || !have.insert(key) {
            continue;
        }
        added.push(LibraryEntry::Path(path.to_string()));
    }

    if added.is_empty() {
        return Arc::clone(current);
    }

    let mut next = Vec::with_capacity(current.len() + added.len());
    next.extend(current.iter().cloned());
    next.extend(added);
    Arc::new(next)
}

/// The deduplicated collection of known backgrounds.
#[derive(Debug, Clone, Default)]
pub struct BackgroundLibrary {
    backgrounds: Arc<Vec<LibraryEntry>>,
}

impl BackgroundLibrary {
    pub fn entries(&self) -> &[LibraryEntry] {
        &self.backgrounds
    }

    /// Shared handle to the entry list. Unchanged merges keep the same handle.
    pub fn backgrounds(&self) -> &Arc<Vec<LibraryEntry>> {
        &self.backgrounds
    }

    pub fn len(&self) -> usize {
        self.backgrounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backgrounds.is_empty()
    }

    /// Whether an entry with the same file name (ignoring case) exists.
    pub fn contains_file(&self, path: &str) -> bool {
        let key = file_key(path);
        !key.is_empty() && self.entries().iter().any(|entry| file_key(entry.path()) == key)
    }

    /// Merge paths into the library. Returns `true` if anything was added.
    pub fn add_paths<S: AsRef<str>>(&mut self, paths: &[S]) -> bool {
        let next = reconcile(self.backgrounds(), paths);
        if Arc::ptr_eq(&next, self.backgrounds()) {
            return false;
        }
        self.backgrounds = next;
        true
    }

    /// Drop the entry whose file name matches `name`, ignoring case.
    pub fn remove_file(&mut self, name: &str) -> bool {
        let key = file_key(name);
        if !self.contains_file(name) {
            return false;
        }
        let next: Vec<LibraryEntry> = self
            .backgrounds
            .iter()
            .filter(|entry| file_key(entry.path()) != key)
            .cloned()
            .collect();
        self.backgrounds = Arc::new(next);
        true
    }

    /// Entries shown in the picker: allowed extensions only, first path per
    /// file name.
    pub fn picker_entries(&self) -> Vec<&LibraryEntry> {
        let mut seen = HashSet::new();
        self.entries()
            .iter()
            .filter(|entry| is_allowed_background(entry.path()))
            .filter(|entry| seen.insert(file_key(entry.path())))
            .collect()
    }
}
