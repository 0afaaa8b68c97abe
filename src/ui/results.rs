// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Render results panel.
//!
//! Links to the files of the latest render with their style trace, followed
//! by the accumulated render logs.

use crate::render::orchestrator::RenderSession;

/// Result of results panel interaction.
pub enum ResultsAction {
    None,
    Hide,
}

/// Display the results of the current render session.
pub fn show(ui: &mut egui::Ui, session: &RenderSession) -> ResultsAction {
    let mut action = ResultsAction::None;

    if session.visible {
        ui.horizontal(|ui| {
            ui.strong("Results");
            if session.running {
                ui.spinner();
                ui.label(egui::RichText::new("Rendering…").weak());
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Hide").clicked() {
                    action = ResultsAction::Hide;
                }
            });
        });

        if !session.outputs.is_empty() {
            for output in &session.outputs {
                ui.horizontal(|ui| {
                    ui.hyperlink_to("Open", &output.url).on_hover_text(output.url.as_str());
                    ui.label(egui::RichText::new(output.trace.summary()).monospace().small());
                    ui.label(egui::RichText::new(output.id.as_str()).small().weak());
                });
            }
        } else if !session.running {
            ui.label(
                egui::RichText::new("No files produced — check the logs below.")
                    .small()
                    .color(egui::Color32::from_rgb(252, 211, 77)),
            );
        }
    }

    if !session.logs.is_empty() {
        ui.separator();
        egui::ScrollArea::vertical()
            .id_source("render_logs")
            .max_height(160.0)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for line in &session.logs {
                    ui.label(egui::RichText::new(line.as_str()).small().monospace());
                }
            });
    }

    action
}
