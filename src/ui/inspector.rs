// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Item inspector panel.
//!
//! Edits one item's text and style, previews it over its background, and
//! assigns backgrounds from the library to the item or the whole selection.

use crate::io::media::PreviewSource;
use crate::models::item::{BackgroundRef, Item, ItemPatch, Position};
use crate::models::library::BackgroundLibrary;
use crate::ui::{preview, storyboard};
use crate::util::number::parse_str_loose;
use crate::util::text::SegmentMode;

/// Default number of storyboard segments.
pub const DEFAULT_SEGMENTS: usize = 6;

/// Inspector state that is not part of the store.
pub struct InspectorState {
    /// Item being inspected.
    pub item_id: Option<String>,
    /// Library path picked but not yet applied.
    pub chosen: Option<String>,
    /// Background dimming in the preview, 0.0 to 0.6.
    pub dim: f32,
    pub segment_mode: SegmentMode,
    pub segment_count: String,
    font_size: String,
    line_gap: String,
    margin: String,
    /// Item the numeric buffers were filled from.
    buffers_for: Option<String>,
}

impl Default for InspectorState {
    fn default() -> Self {
        Self {
            item_id: None,
            chosen: None,
            dim: 0.25,
            segment_mode: SegmentMode::Sentence,
            segment_count: DEFAULT_SEGMENTS.to_string(),
            font_size: String::new(),
            line_gap: String::new(),
            margin: String::new(),
            buffers_for: None,
        }
    }
}

impl InspectorState {
    /// Start inspecting `id`.
    pub fn open(&mut self, id: String) {
        if self.item_id.as_ref() != Some(&id) {
            self.chosen = None;
        }
        self.item_id = Some(id);
    }

    pub fn close(&mut self) {
        self.item_id = None;
        self.chosen = None;
        self.buffers_for = None;
    }

    fn sync_buffers(&mut self, item: &Item) {
        if self.buffers_for.as_deref() == Some(item.id.as_str()) {
            return;
        }
        self.font_size = item.font_size.to_string();
        self.line_gap = item.line_gap.to_string();
        self.margin = item.margin.to_string();
        self.buffers_for = Some(item.id.clone());
    }

    /// Background the preview should show: the pending pick, else the
    /// item's own background.
    pub fn preview_source(&self, item: &Item) -> Option<PreviewSource> {
        if let Some(chosen) = &self.chosen {
            return Some(PreviewSource::Server(chosen.clone()));
        }
        match &item.background {
            BackgroundRef::Server(path) => Some(PreviewSource::Server(path.clone())),
            BackgroundRef::Local(path) => Some(PreviewSource::Local(path.clone())),
            BackgroundRef::None => None,
        }
    }
}

/// Result of inspector interaction.
pub enum InspectorAction {
    None,
    Update(ItemPatch),
    ApplyToCurrent(String),
    ApplyToSelection(String),
    ClearSelectionBackground,
    PickLocalFile,
    DeleteBackground(String),
    Close,
}

/// Display the inspector for `item`.
pub fn show(
    ui: &mut egui::Ui,
    state: &mut InspectorState,
    item: &Item,
    library: &BackgroundLibrary,
    selected_count: usize,
    preview_image: &preview::PreviewImage,
) -> InspectorAction {
    let mut action = InspectorAction::None;
    state.sync_buffers(item);

    ui.horizontal(|ui| {
        ui.heading(format!("Inspector — Item #{}", item.order));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("✖").clicked() {
                action = InspectorAction::Close;
            }
        });
    });
    ui.separator();

    egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        ui.label(egui::RichText::new("Text / Script").small().weak());
        let mut text = item.text.clone();
        if ui
            .add(egui::TextEdit::multiline(&mut text).desired_rows(4).desired_width(f32::INFINITY))
            .changed()
        {
            action = InspectorAction::Update(ItemPatch::Text(text));
        }

        egui::Grid::new("inspector_style").num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
            ui.label("Font size (px)");
            if let Some(v) = number_field(ui, &mut state.font_size) {
                action = InspectorAction::Update(ItemPatch::FontSize(v));
            }
            ui.end_row();

            ui.label("Line spacing (px)");
            if let Some(v) = number_field(ui, &mut state.line_gap) {
                action = InspectorAction::Update(ItemPatch::LineGap(v));
            }
            ui.end_row();

            ui.label("Margin (px)");
            if let Some(v) = number_field(ui, &mut state.margin) {
                action = InspectorAction::Update(ItemPatch::Margin(v));
            }
            ui.end_row();

            ui.label("Position");
            let mut position = item.position;
            egui::ComboBox::from_id_source("inspector_position")
                .selected_text(position.as_str())
                .show_ui(ui, |ui| {
                    for option in Position::ALL {
                        ui.selectable_value(&mut position, option, option.as_str());
                    }
                });
            if position != item.position {
                action = InspectorAction::Update(ItemPatch::Position(position));
            }
            ui.end_row();

            ui.label("Template");
            let mut template = item.template.clone();
            if ui.text_edit_singleline(&mut template).changed() {
                action = InspectorAction::Update(ItemPatch::Template(template));
            }
            ui.end_row();

            ui.label("Target");
            let mut target = item.target.clone();
            if ui.text_edit_singleline(&mut target).changed() {
                action = InspectorAction::Update(ItemPatch::Target(target));
            }
            ui.end_row();
        });

        ui.add_space(8.0);
        preview::show(ui, preview_image, item, state.dim);
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Dim BG").small().weak());
            ui.add(egui::Slider::new(&mut state.dim, 0.0..=0.6).step_by(0.05));
        });

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Current BG:").small().weak());
            match (item.background_path(), item.local_bg()) {
                (Some(path), _) => {
                    ui.label(crate::models::library::file_name(path)).on_hover_text(path);
                }
                (None, Some(local)) => {
                    ui.label(format!("local: {}", local.display()));
                }
                (None, None) => {
                    ui.label(egui::RichText::new("none").weak());
                }
            }
        });

        ui.horizontal_wrapped(|ui| {
            let chosen = state.chosen.clone();
            if ui.add_enabled(chosen.is_some(), egui::Button::new("Apply to current")).clicked() {
                if let Some(path) = chosen.clone() {
                    action = InspectorAction::ApplyToCurrent(path);
                }
            }
            if ui
                .add_enabled(
                    chosen.is_some() && selected_count > 0,
                    egui::Button::new(format!("Apply BG to selection ({})", selected_count)),
                )
                .clicked()
            {
                if let Some(path) = chosen {
                    action = InspectorAction::ApplyToSelection(path);
                }
            }
            if ui.button("Clear BG").clicked() {
                action = InspectorAction::ClearSelectionBackground;
            }
            if ui.button("Local file preview…").clicked() {
                action = InspectorAction::PickLocalFile;
            }
        });

        ui.separator();
        if let Some(a) = library_picker(ui, state, item, library) {
            action = a;
        }

        ui.separator();
        storyboard::show(ui, &item.text, &mut state.segment_mode, &mut state.segment_count);
    });

    action
}

/// Text field that yields a number whenever its content parses.
fn number_field(ui: &mut egui::Ui, buffer: &mut String) -> Option<f64> {
    let response = ui.add(egui::TextEdit::singleline(buffer).desired_width(80.0));
    if !response.changed() {
        return None;
    }
    let value = parse_str_loose(buffer, f64::NAN);
    value.is_finite().then_some(value)
}

fn library_picker(
    ui: &mut egui::Ui,
    state: &mut InspectorState,
    item: &Item,
    library: &BackgroundLibrary,
) -> Option<InspectorAction> {
    let mut action = None;
    if library.is_empty() {
        ui.label(egui::RichText::new("Empty. Upload backgrounds from the toolbar.").weak());
        return None;
    }

    let entries = library.picker_entries();
    let current = item.background_path().map(crate::models::library::file_key);
    ui.label(egui::RichText::new(format!("Showing {} backgrounds", entries.len())).small().weak());

    egui::Grid::new("library_picker").num_columns(2).striped(true).show(ui, |ui| {
        for entry in entries {
            let path = entry.path();
            let is_chosen = state.chosen.as_deref() == Some(path);
            let is_current = current.as_deref() == Some(crate::models::library::file_key(path).as_str());

            let mut label = String::new();
            if crate::io::media::is_video(path) {
                label.push_str("🎞 ");
            }
            label.push_str(entry.file_name());
            if is_current {
                label.push_str("  (current)");
            }

            if ui.selectable_label(is_chosen, label).on_hover_text(path).clicked() {
                state.chosen = Some(path.to_string());
            }
            if ui.small_button("🗑").on_hover_text("Delete from server").clicked() {
                action = Some(InspectorAction::DeleteBackground(entry.file_name().to_string()));
            }
            ui.end_row();
        }
    });

    action
}
