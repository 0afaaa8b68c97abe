// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Storyboard strip.
//!
//! Shows how an item's script splits into on-screen segments.

use super::inspector::DEFAULT_SEGMENTS;
use crate::util::number::parse_str_loose;
use crate::util::text::{segment_text, SegmentMode};

const MIN_SEGMENTS: usize = 3;
const MAX_SEGMENTS: usize = 12;

/// Segment count typed by the user, clamped to the supported range.
fn segment_count(input: &str) -> usize {
    let value = parse_str_loose(input, DEFAULT_SEGMENTS as f64).round();
    value.clamp(MIN_SEGMENTS as f64, MAX_SEGMENTS as f64) as usize
}

/// Display segment controls and the resulting segments.
pub fn show(ui: &mut egui::Ui, text: &str, mode: &mut SegmentMode, count: &mut String) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Segments").small().weak());
        ui.add(egui::TextEdit::singleline(count).desired_width(40.0))
            .on_hover_text("5–8 recommended, 3–12 allowed");
        egui::ComboBox::from_id_source("segment_mode")
            .selected_text(mode.as_str())
            .show_ui(ui, |ui| {
                for option in SegmentMode::ALL {
                    ui.selectable_value(mode, option, option.as_str());
                }
            });
    });

    let parts = segment_text(text, *mode, segment_count(count));

    if parts.is_empty() {
        ui.label(egui::RichText::new("No text to segment").weak());
        return;
    }

    for (idx, part) in parts.iter().enumerate() {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new(format!("{}", idx + 1)).small().strong());
                if part.is_empty() {
                    ui.label(egui::RichText::new("(empty)").weak().italics());
                } else {
                    ui.label(part.as_str());
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_count_is_clamped() {
        assert_eq!(segment_count("7"), 7);
        assert_eq!(segment_count("5,6"), 6);
        assert_eq!(segment_count(""), DEFAULT_SEGMENTS);
        assert_eq!(segment_count("abc"), DEFAULT_SEGMENTS);
        assert_eq!(segment_count("1"), MIN_SEGMENTS);
        assert_eq!(segment_count("-4"), MIN_SEGMENTS);
        assert_eq!(segment_count("1e20"), MAX_SEGMENTS);
        assert_eq!(segment_count("1000000000"), MAX_SEGMENTS);
    }
}
