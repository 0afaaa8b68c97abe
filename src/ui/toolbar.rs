// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with the top-level editor actions.
//!
//! Import a script, upload backgrounds, resync the library, and start a
//! render of the current selection.

/// Result of toolbar interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    ImportScript,
    UploadBackgrounds,
    RefreshLibrary,
    Render,
}

/// Display the toolbar.
pub fn show(
    ui: &mut egui::Ui,
    library_count: usize,
    selected_count: usize,
    busy: bool,
    rendering: bool,
    status: &str,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label(egui::RichText::new("Storyboard").strong());

        ui.separator();

        if ui.button("📄 Import .txt").clicked() {
            action = ToolbarAction::ImportScript;
        }

        if ui.button("🖼 Upload Backgrounds").clicked() {
            action = ToolbarAction::UploadBackgrounds;
        }

        if ui.button("⟳ Sync Library").clicked() {
            action = ToolbarAction::RefreshLibrary;
        }

        ui.separator();

        let render_label = if rendering {
            "Rendering…".to_string()
        } else {
            format!("▶ Render Selected ({})", selected_count)
        };
        if ui
            .add_enabled(selected_count > 0 && !rendering, egui::Button::new(render_label))
            .clicked()
        {
            action = ToolbarAction::Render;
        }

        ui.separator();

        ui.label(
            egui::RichText::new(format!("● {} in library", library_count))
                .small()
                .color(egui::Color32::from_rgb(16, 185, 129)),
        );

        if busy {
            ui.spinner();
        }
        ui.label(egui::RichText::new(status).italics().weak());
    });

    action
}
