// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Render job mapping.
//!
//! Converts pixel-space item styles (measured against a 1080-unit-tall
//! reference canvas) into the relative units the renderer consumes, so the
//! same job renders consistently at any output resolution.
//!
//! The canonical values live in [`RelativeStyle`]. The renderer's wire format
//! also carries camelCase mirrors and the original pixel fields; those are
//! produced only when a [`RenderJob`] is serialized.

use super::item::{Item, Position, StyleDefaults};
use crate::api::to_server_path;
use crate::util::number::{finite_or, parse_num_loose};
use serde::ser::Serializer;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Height of the canvas the pixel-space fields are measured against.
pub const REFERENCE_HEIGHT: f64 = 1080.0;

/// Line gap (in ems) used when the font size is zero.
pub const FALLBACK_LINE_GAP_EM: f64 = 0.42;

/// Loosely-typed source for a render job.
///
/// Every field is optional; missing or non-finite numbers fall back to the
/// style defaults when mapped.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct JobInput {
    pub id: String,
    pub text: Option<String>,
    pub background: Option<String>,
    #[serde(rename = "backgroundPath")]
    pub background_path: Option<String>,
    #[serde(rename = "backgroundUrl")]
    pub background_url: Option<String>,
    #[serde(rename = "fontSize", alias = "font_size", deserialize_with = "loose_number")]
    pub font_size: Option<f64>,
    #[serde(rename = "lineGap", alias = "line_gap", deserialize_with = "loose_number")]
    pub line_gap: Option<f64>,
    #[serde(deserialize_with = "loose_number")]
    pub margin: Option<f64>,
    #[serde(deserialize_with = "loose_position")]
    pub position: Option<Position>,
    pub template: Option<String>,
    pub target: Option<String>,
}

fn loose_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let n = parse_num_loose(&value, f64::NAN);
    Ok(n.is_finite().then_some(n))
}

fn loose_position<'de, D>(deserializer: D) -> Result<Option<Position>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl From<&Item> for JobInput {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            text: Some(item.text.clone()),
            background: None,
            background_path: item.background_path().map(str::to_string),
            background_url: item.background_url().map(str::to_string),
            font_size: Some(item.font_size),
            line_gap: Some(item.line_gap),
            margin: Some(item.margin),
            position: Some(item.position),
            template: Some(item.template.clone()),
            target: Some(item.target.clone()),
        }
    }
}

impl From<&RenderJob> for JobInput {
    fn from(job: &RenderJob) -> Self {
        Self {
            id: job.id.clone(),
            text: Some(job.text.clone()),
            background: job.background.clone(),
            background_path: None,
            background_url: None,
            font_size: Some(job.font_size),
            line_gap: Some(job.line_gap),
            margin: Some(job.margin),
            position: Some(job.style.position),
            template: Some(job.template.clone()),
            target: Some(job.target.clone()),
        }
    }
}

/// Text style expressed relative to canvas height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeStyle {
    /// Font size as a percentage of canvas height.
    pub font_vh: f64,
    /// Margin as a percentage of canvas height.
    pub margin_vh: f64,
    /// Line gap as a multiple of the font size.
    pub line_gap_em: f64,
    pub position: Position,
}

impl RelativeStyle {
    pub fn from_pixels(font_size: f64, line_gap: f64, margin: f64, position: Position) -> Self {
        let line_gap_em = if font_size > 0.0 {
            line_gap / font_size
        } else {
            FALLBACK_LINE_GAP_EM
        };
        Self {
            font_vh: font_size / REFERENCE_HEIGHT * 100.0,
            margin_vh: margin / REFERENCE_HEIGHT * 100.0,
            line_gap_em,
            position,
        }
    }
}

/// Renderer-facing payload derived from an item.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub id: String,
    pub text: String,
    /// Server-relative path, or a foreign absolute URL.
    pub background: Option<String>,
    pub template: String,
    pub target: String,
    /// Pixel-space source values.
    pub font_size: f64,
    pub line_gap: f64,
    pub margin: f64,
    pub style: RelativeStyle,
}

/// Map a job source to a render job.
pub fn map_job(input: &JobInput, defaults: &StyleDefaults, api_base: &str) -> RenderJob {
    let font_size = finite_or(input.font_size, defaults.font_size);
    let line_gap = finite_or(input.line_gap, defaults.line_gap);
    let margin = finite_or(input.margin, defaults.margin);
    let position = input.position.unwrap_or(defaults.position);

    let background = [&input.background, &input.background_path, &input.background_url]
        .into_iter()
        .flatten()
        .next()
        .and_then(|path| to_server_path(path, api_base));

    RenderJob {
        id: input.id.clone(),
        text: input.text.clone().unwrap_or_default(),
        background,
        template: non_empty(&input.template).unwrap_or(&defaults.template).to_string(),
        target: non_empty(&input.target).unwrap_or(&defaults.target).to_string(),
        font_size,
        line_gap,
        margin,
        style: RelativeStyle::from_pixels(font_size, line_gap, margin, position),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[derive(Serialize)]
struct JobWire<'a> {
    id: &'a str,
    text: &'a str,
    background: Option<&'a str>,
    template: &'a str,
    target: &'a str,
    #[serde(rename = "fontSize")]
    font_size: f64,
    #[serde(rename = "lineGap")]
    line_gap: f64,
    margin: f64,
    position: Position,
    style: StyleWire,
}

#[derive(Serialize)]
struct StyleWire {
    size_mode: &'static str,
    font_vh: f64,
    margin_vh: f64,
    line_gap_em: f64,
    text_position: Position,
    #[serde(rename = "sizeMode")]
    size_mode_mirror: &'static str,
    #[serde(rename = "fontVh")]
    font_vh_mirror: f64,
    #[serde(rename = "marginVh")]
    margin_vh_mirror: f64,
    #[serde(rename = "lineGapEm")]
    line_gap_em_mirror: f64,
    position: Position,
}

impl From<&RelativeStyle> for StyleWire {
    fn from(style: &RelativeStyle) -> Self {
        Self {
            size_mode: "vh",
            font_vh: style.font_vh,
            margin_vh: style.margin_vh,
            line_gap_em: style.line_gap_em,
            text_position: style.position,
            size_mode_mirror: "vh",
            font_vh_mirror: style.font_vh,
            margin_vh_mirror: style.margin_vh,
            line_gap_em_mirror: style.line_gap_em,
            position: style.position,
        }
    }
}

impl Serialize for RenderJob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        JobWire {
            id: &self.id,
            text: &self.text,
            background: self.background.as_deref(),
            template: &self.template,
            target: &self.target,
            font_size: self.font_size,
            line_gap: self.line_gap,
            margin: self.margin,
            position: self.style.position,
            style: StyleWire::from(&self.style),
        }
        .serialize(serializer)
    }
}
