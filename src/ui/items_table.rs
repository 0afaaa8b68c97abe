// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Items table.
//!
//! Lists the imported items with search, multi-selection and a per-item
//! background status.

use crate::models::item::ItemStatus;
use crate::models::store::Store;

/// Result of table interaction.
pub enum TableAction {
    None,
    SetSelected(String, bool),
    SelectMany(Vec<String>),
    Edit(String),
}

const READY_COLOR: egui::Color32 = egui::Color32::from_rgb(52, 211, 153);
const RELINK_COLOR: egui::Color32 = egui::Color32::from_rgb(251, 191, 36);

/// Display the items table.
pub fn show(ui: &mut egui::Ui, store: &Store, query: &mut String, editing: Option<&str>) -> TableAction {
    let mut action = TableAction::None;

    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(query)
                .hint_text("Search quotes…")
                .desired_width(280.0),
        );
        if ui.button("Clear").clicked() {
            query.clear();
        }
        ui.label(
            egui::RichText::new(format!("{} selected", store.selected_count()))
                .small()
                .weak(),
        );
    });

    ui.separator();

    let filtered = store.filter_items(query);
    let library = store.library();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            egui::Grid::new("items_table")
                .striped(true)
                .num_columns(7)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    let selected = store.selected();
                    let mut all_selected = !filtered.is_empty()
                        && !selected.is_empty()
                        && filtered.iter().all(|item| selected.contains(&item.id));
                    if ui.checkbox(&mut all_selected, "").changed() {
                        let ids = if all_selected {
                            filtered.iter().map(|item| item.id.clone()).collect()
                        } else {
                            Vec::new()
                        };
                        action = TableAction::SelectMany(ids);
                    }
                    ui.strong("#");
                    ui.strong("Text / Script");
                    ui.strong("BG");
                    ui.strong("Template");
                    ui.strong("Target");
                    ui.strong("Actions");
                    ui.end_row();

                    for item in &filtered {
                        let mut checked = store.is_selected(&item.id);
                        if ui.checkbox(&mut checked, "").changed() {
                            action = TableAction::SetSelected(item.id.clone(), checked);
                        }

                        ui.label(egui::RichText::new(item.order.to_string()).weak());

                        ui.vertical(|ui| {
                            ui.add(egui::Label::new(item.text.as_str()).truncate())
                                .on_hover_text(item.text.as_str());
                            let status = item.status(library);
                            let color = match status {
                                ItemStatus::Ready => READY_COLOR,
                                ItemStatus::RelinkNeeded => RELINK_COLOR,
                            };
                            ui.label(egui::RichText::new(status.label()).small().color(color));
                        });

                        match (item.background_path(), item.local_bg()) {
                            (Some(path), _) => {
                                ui.label(egui::RichText::new(path).monospace().small());
                            }
                            (None, Some(local)) => {
                                ui.label(
                                    egui::RichText::new(format!("local: {}", local.display()))
                                        .small()
                                        .italics(),
                                );
                            }
                            (None, None) => {
                                ui.label(egui::RichText::new("none").small().weak());
                            }
                        }

                        ui.label(item.template.as_str());
                        ui.label(item.target.as_str());

                        let label = if editing == Some(item.id.as_str()) { "Editing" } else { "Edit" };
                        if ui.button(label).clicked() {
                            action = TableAction::Edit(item.id.clone());
                        }
                        ui.end_row();
                    }
                });

            if filtered.is_empty() {
                ui.add_space(24.0);
                ui.vertical_centered(|ui| {
                    let message = if store.items().is_empty() {
                        "Import a .txt script to begin"
                    } else {
                        "No results."
                    };
                    ui.label(egui::RichText::new(message).weak());
                });
            }
        });

    action
}
