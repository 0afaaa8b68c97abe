// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Render item data structures.
//!
//! An item pairs a line of script text with a background asset and the
//! pixel-space style parameters it should be rendered with.

use super::library::BackgroundLibrary;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Vertical placement of the text block on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Top,
    Center,
    #[default]
    Bottom,
}

impl Position {
    pub const ALL: [Position; 3] = [Position::Top, Position::Center, Position::Bottom];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Top => "top",
            Position::Center => "center",
            Position::Bottom => "bottom",
        }
    }
}

/// Where an item's background comes from.
///
/// A server background is exposed through both `background_path` and
/// `background_url`, so the two always agree. A local file is mutually
/// exclusive with them.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BackgroundRef {
    #[default]
    None,
    Server(String),
    Local(PathBuf),
}

/// Style values applied to freshly imported items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleDefaults {
    /// Font size in pixels on a 1080-unit-tall reference canvas.
    pub font_size: f64,
    /// Gap between lines, in pixels.
    pub line_gap: f64,
    /// Margin around the text block, in pixels.
    pub margin: f64,
    pub position: Position,
    pub template: String,
    pub target: String,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            font_size: 64.0,
            line_gap: 8.0,
            margin: 96.0,
            position: Position::Bottom,
            template: "bold-stoic-v2".to_string(),
            target: "18-28s".to_string(),
        }
    }
}

impl StyleDefaults {
    /// Replace any out-of-range value with its built-in default.
    pub fn validated(self) -> Self {
        let fallback = Self::default();
        Self {
            font_size: positive_or(self.font_size, fallback.font_size),
            line_gap: non_negative_or(self.line_gap, fallback.line_gap),
            margin: non_negative_or(self.margin, fallback.margin),
            position: self.position,
            template: non_empty_or(self.template, fallback.template),
            target: non_empty_or(self.target, fallback.target),
        }
    }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

fn non_negative_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        fallback
    }
}

fn non_empty_or(value: String, fallback: String) -> String {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// One text/background pairing to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    /// 1-based rank from the imported source.
    pub order: usize,
    pub text: String,
    pub background: BackgroundRef,
    pub font_size: f64,
    pub line_gap: f64,
    pub margin: f64,
    pub position: Position,
    pub template: String,
    pub target: String,
}

impl Item {
    /// Create an item with a fresh id and the given style defaults.
    pub fn new(order: usize, text: String, defaults: &StyleDefaults) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), order, text, defaults)
    }

    pub fn with_id(id: String, order: usize, text: String, defaults: &StyleDefaults) -> Self {
        Self {
            id,
            order,
            text,
            background: BackgroundRef::None,
            font_size: defaults.font_size,
            line_gap: defaults.line_gap,
            margin: defaults.margin,
            position: defaults.position,
            template: defaults.template.clone(),
            target: defaults.target.clone(),
        }
    }

    pub fn background_path(&self) -> Option<&str> {
        match &self.background {
            BackgroundRef::Server(path) => Some(path),
            _ => None,
        }
    }

    /// Mirror of [`Item::background_path`].
    pub fn background_url(&self) -> Option<&str> {
        self.background_path()
    }

    pub fn local_bg(&self) -> Option<&Path> {
        match &self.background {
            BackgroundRef::Local(path) => Some(path),
            _ => None,
        }
    }

    /// Whether the item's background is known to the library.
    pub fn status(&self, library: &BackgroundLibrary) -> ItemStatus {
        match self.background_path() {
            Some(path) if library.contains_file(path) => ItemStatus::Ready,
            _ => ItemStatus::RelinkNeeded,
        }
    }
}

/// Non-blocking readiness indicator shown next to each item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Ready,
    RelinkNeeded,
}

impl ItemStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Ready => "Ready",
            ItemStatus::RelinkNeeded => "Relink needed",
        }
    }
}

/// A single-field edit to an item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemPatch {
    Text(String),
    FontSize(f64),
    LineGap(f64),
    Margin(f64),
    Position(Position),
    Template(String),
    Target(String),
    Background(BackgroundRef),
}

impl ItemPatch {
    /// Reject values the renderer cannot use.
    pub fn validate(&self) -> Result<()> {
        match self {
            ItemPatch::FontSize(v) if !(v.is_finite() && *v > 0.0) => {
                bail!("font size must be a positive number, got {}", v)
            }
            ItemPatch::LineGap(v) if !(v.is_finite() && *v >= 0.0) => {
                bail!("line gap must be zero or more, got {}", v)
            }
            ItemPatch::Margin(v) if !(v.is_finite() && *v >= 0.0) => {
                bail!("margin must be zero or more, got {}", v)
            }
            _ => Ok(()),
        }
    }

    pub fn apply(self, item: &mut Item) {
        match self {
            ItemPatch::Text(text) => item.text = text,
            ItemPatch::FontSize(v) => item.font_size = v,
            ItemPatch::LineGap(v) => item.line_gap = v,
            ItemPatch::Margin(v) => item.margin = v,
            ItemPatch::Position(p) => item.position = p,
            ItemPatch::Template(t) => item.template = t,
            ItemPatch::Target(t) => item.target = t,
            ItemPatch::Background(bg) => item.background = bg,
        }
    }
}
