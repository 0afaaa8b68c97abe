// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Item and selection store.
//!
//! The single owner of the item list, the current multi-selection, and the
//! background library. Every change goes through one of the operations
//! below; each runs to completion before the next one starts, so readers
//! never observe a half-applied mutation.

use super::item::{BackgroundRef, Item, ItemPatch};
use super::library::BackgroundLibrary;
use std::collections::HashSet;
use std::path::PathBuf;

/// Background change applied to every selected item.
///
/// When several fields are set, `clear` wins over `path`, and `path` over
/// `file`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttachBackground {
    pub path: Option<String>,
    pub file: Option<PathBuf>,
    pub clear: bool,
}

impl AttachBackground {
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn file(file: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(file.into()),
            ..Self::default()
        }
    }

    pub fn clear() -> Self {
        Self {
            clear: true,
            ..Self::default()
        }
    }

    fn resolve(&self) -> Option<BackgroundRef> {
        if self.clear {
            Some(BackgroundRef::None)
        } else if let Some(path) = self.path.as_ref().filter(|p| !p.is_empty()) {
            Some(BackgroundRef::Server(path.clone()))
        } else {
            self.file.as_ref().map(|file| BackgroundRef::Local(file.clone()))
        }
    }
}

/// Process-wide editor state.
#[derive(Debug, Default)]
pub struct Store {
    items: Vec<Item>,
    /// May hold ids of items that no longer exist.
    selected: HashSet<String>,
    lib: BackgroundLibrary,
    revision: u64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn selected(&self) -> &HashSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected items, in list order.
    pub fn selected_items(&self) -> Vec<Item> {
        self.items
            .iter()
            .filter(|item| self.selected.contains(&item.id))
            .cloned()
            .collect()
    }

    pub fn library(&self) -> &BackgroundLibrary {
        &self.lib
    }

    /// Bumped on every mutation that changed state.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Items whose text contains `query`, ignoring case. An empty query
    /// matches everything.
    pub fn filter_items(&self, query: &str) -> Vec<&Item> {
        let needle = query.to_lowercase();
        self.items
            .iter()
            .filter(|item| needle.is_empty() || item.text.to_lowercase().contains(&needle))
            .collect()
    }

    /// Replace the whole item list. The selection is always cleared.
    pub fn set_items(&mut self, items: Vec<Item>) {
        log::info!("Replaced item list, total: {}", items.len());
        self.items = items;
        self.selected.clear();
        self.bump();
    }

    /// Apply `patch` to the item with `id`. Returns `false` when no item
    /// matches or the patch is rejected.
    pub fn update_item(&mut self, id: &str, patch: ItemPatch) -> bool {
        if let Err(e) = patch.validate() {
            log::warn!("Ignoring edit to item {}: {}", id, e);
            return false;
        }
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            log::debug!("No item with id {} to update", id);
            return false;
        };
        patch.apply(item);
        self.bump();
        true
    }

    /// Set membership of `id` to `checked`, or flip it when `checked` is
    /// `None`.
    pub fn toggle_select(&mut self, id: &str, checked: Option<bool>) {
        let on = checked.unwrap_or(!self.selected.contains(id));
        let changed = if on {
            self.selected.insert(id.to_string())
        } else {
            self.selected.remove(id)
        };
        if changed {
            self.bump();
        }
    }

    /// Replace the selection wholesale.
    pub fn select_many<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.selected = ids.into_iter().collect();
        log::debug!("Selection replaced, {} selected", self.selected.len());
        self.bump();
    }

    /// Merge background paths into the library. Returns `true` if the
    /// library changed.
    pub fn add_background_paths<S: AsRef<str>>(&mut self, paths: &[S]) -> bool {
        let changed = self.lib.add_paths(paths);
        if changed {
            log::info!("Background library now has {} entries", self.lib.len());
            self.bump();
        }
        changed
    }

    /// Forget a background by file name, e.g. after it was deleted on the
    /// server.
    pub fn remove_background(&mut self, name: &str) -> bool {
        let changed = self.lib.remove_file(name);
        if changed {
            log::info!("Removed background {} from library", name);
            self.bump();
        }
        changed
    }

    /// Apply a background change to every selected item. Returns the number
    /// of items touched.
    pub fn attach_background_to_selection(&mut self, attach: AttachBackground) -> usize {
        if self.selected.is_empty() {
            return 0;
        }
        let Some(background) = attach.resolve() else {
            return 0;
        };

        let mut touched = 0;
        for item in self.items.iter_mut().filter(|item| self.selected.contains(&item.id)) {
            item.background = background.clone();
            touched += 1;
        }
        if touched > 0 {
            log::info!("Updated background on {} selected item(s)", touched);
            self.bump();
        }
        touched
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}
