// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the store, runs network and file work on
//! background threads, and applies their results on the UI thread.

use crate::api::client::{ApiClient, RenderBackend};
use crate::api::models::{BackgroundInfo, DeleteResponse, UploadResponse};
use crate::api::to_absolute_url;
use crate::config::AppConfig;
use crate::io::media::{self, LoadedImage, PreviewSource};
use crate::models::item::{BackgroundRef, Item, ItemPatch};
use crate::models::library::{file_key, file_name, ALLOWED_EXTENSIONS};
use crate::models::store::{AttachBackground, Store};
use crate::render::orchestrator::{self, RenderReport, RenderSession, RenderToken};
use crate::ui::inspector::{InspectorAction, InspectorState};
use crate::ui::items_table::TableAction;
use crate::ui::preview::PreviewImage;
use crate::ui::results::ResultsAction;
use crate::ui::toolbar::ToolbarAction;
use crate::ui::{inspector, items_table, results, toolbar};
use anyhow::Result;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Result of a background task, delivered to the UI thread.
enum TaskResult {
    LibraryListed(Vec<BackgroundInfo>),
    Uploaded {
        files: usize,
        response: UploadResponse,
        listing: Vec<BackgroundInfo>,
    },
    Deleted {
        name: String,
        response: DeleteResponse,
    },
    Imported {
        path: PathBuf,
        result: Result<Vec<Item>, String>,
    },
    Rendered {
        token: RenderToken,
        report: RenderReport,
    },
    PreviewLoaded {
        source: PreviewSource,
        result: Result<LoadedImage, String>,
    },
    /// A worker panicked before producing its result.
    Failed(String),
}

/// Run `task`, turning a panic into the result built by `on_panic`.
fn run_task<F, P>(task: F, on_panic: P) -> TaskResult
where
    F: FnOnce() -> TaskResult,
    P: FnOnce(String) -> TaskResult,
{
    match panic::catch_unwind(AssertUnwindSafe(task)) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            log::error!("Background task panicked: {}", message);
            on_panic(message)
        }
    }
}

/// Main application state.
pub struct StoryboardApp {
    config: AppConfig,
    client: Arc<ApiClient>,

    /// The single source of truth for items, selection and library
    store: Store,

    /// Outputs and logs of the latest render
    session: RenderSession,

    inspector: InspectorState,

    /// Items table search text
    query: String,

    /// Status line shown in the toolbar
    status: String,

    /// Number of background tasks still running
    pending: usize,

    sender: Sender<TaskResult>,
    receiver: Receiver<TaskResult>,

    /// Background shown in the inspector preview
    preview: Option<(PreviewSource, PreviewImage)>,

    /// Whether the initial library sync has been started
    started: bool,

    /// Store revision as of the previous frame
    seen_revision: u64,

    /// Set when UI composition panicked; replaces the whole view
    crash: Option<String>,
}

impl StoryboardApp {
    /// Create a new application instance.
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Arc::new(ApiClient::new(&config.api_base, config.request_timeout())?);
        log::info!("Using rendering backend at {}", client.api_base());
        Ok(Self::with_client(config, client))
    }

    fn with_client(config: AppConfig, client: Arc<ApiClient>) -> Self {
        let (sender, receiver) = channel();
        Self {
            config,
            client,
            store: Store::new(),
            session: RenderSession::default(),
            inspector: InspectorState::default(),
            query: String::new(),
            status: String::new(),
            pending: 0,
            sender,
            receiver,
            preview: None,
            started: false,
            seen_revision: 0,
            crash: None,
        }
    }

    /// Throw away all state and start over, as after a crash.
    fn reload(&mut self) {
        log::info!("Reloading application state");
        // Tasks still in flight report to the old channel and are dropped.
        *self = Self::with_client(self.config.clone(), Arc::clone(&self.client));
    }

    /// Run `task` on a worker thread and deliver its result to `update`.
    fn spawn<F>(&mut self, ctx: &egui::Context, task: F)
    where
        F: FnOnce() -> TaskResult + Send + 'static,
    {
        self.spawn_with(ctx, task, TaskResult::Failed);
    }

    /// Like [`Self::spawn`], with the result to deliver if `task` panics.
    fn spawn_with<F, P>(&mut self, ctx: &egui::Context, task: F, on_panic: P)
    where
        F: FnOnce() -> TaskResult + Send + 'static,
        P: FnOnce(String) -> TaskResult + Send + 'static,
    {
        let sender = self.sender.clone();
        let ctx = ctx.clone();
        self.pending += 1;
        std::thread::spawn(move || {
            let _ = sender.send(run_task(task, on_panic));
            ctx.request_repaint();
        });
    }

    fn refresh_library(&mut self, ctx: &egui::Context) {
        let client = Arc::clone(&self.client);
        self.spawn(ctx, move || TaskResult::LibraryListed(client.list_backgrounds()));
    }

    fn import_script(&mut self, ctx: &egui::Context) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Text", &["txt"])
            .pick_file()
        else {
            return;
        };
        let defaults = self.config.style.clone();
        self.status = "Importing…".to_string();
        self.spawn(ctx, move || {
            let result = crate::io::import::import_file(&path, &defaults).map_err(|e| format!("{:#}", e));
            TaskResult::Imported { path, result }
        });
    }

    fn upload_backgrounds(&mut self, ctx: &egui::Context) {
        let Some(files) = rfd::FileDialog::new()
            .add_filter("Media", &ALLOWED_EXTENSIONS)
            .pick_files()
        else {
            return;
        };
        if files.is_empty() {
            return;
        }
        let client = Arc::clone(&self.client);
        self.status = "Uploading…".to_string();
        self.spawn(ctx, move || {
            let response = client.upload_backgrounds(&files);
            let listing = client.list_backgrounds();
            TaskResult::Uploaded {
                files: files.len(),
                response,
                listing,
            }
        });
    }

    fn delete_background(&mut self, ctx: &egui::Context, name: String) {
        let client = Arc::clone(&self.client);
        self.status = format!("Deleting {}…", name);
        self.spawn(ctx, move || {
            let response = client.delete_background(&name);
            TaskResult::Deleted { name, response }
        });
    }

    fn start_render(&mut self, ctx: &egui::Context) {
        let targets = self.store.selected_items();
        if targets.is_empty() {
            return;
        }
        let token = self.session.begin();
        let client = Arc::clone(&self.client);
        let options = self.config.render_options();
        log::info!("Rendering {} selected item(s)", targets.len());
        self.spawn_with(
            ctx,
            move || {
                let report = orchestrator::start_render(client.as_ref(), &targets, &options);
                TaskResult::Rendered { token, report }
            },
            move |message| TaskResult::Rendered {
                token,
                report: RenderReport {
                    outputs: Vec::new(),
                    logs: vec![format!("render error: {}", message)],
                },
            },
        );
    }

    /// Begin loading the preview for `source` unless it is already shown.
    fn request_preview(&mut self, ctx: &egui::Context, source: Option<PreviewSource>) {
        let Some(source) = source else {
            self.preview = None;
            return;
        };
        if matches!(&self.preview, Some((current, _)) if *current == source) {
            return;
        }
        if source.is_video() {
            let label = format!("🎞 {}", file_name(&source.label()));
            self.preview = Some((source, PreviewImage::Placeholder(label)));
            return;
        }

        self.preview = Some((source.clone(), PreviewImage::Loading));
        let client = Arc::clone(&self.client);
        let api_base = self.config.api_base.clone();
        let fallback = source.clone();
        self.spawn_with(
            ctx,
            move || {
                let result = media::load_preview(&source, &client, &api_base).map_err(|e| format!("{:#}", e));
                TaskResult::PreviewLoaded { source, result }
            },
            move |message| TaskResult::PreviewLoaded {
                source: fallback,
                result: Err(message),
            },
        );
    }

    /// Apply finished background tasks to the store.
    fn drain_tasks(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.receiver.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            match result {
                TaskResult::LibraryListed(listing) => {
                    let paths: Vec<&str> = listing.iter().map(|b| b.path.as_str()).collect();
                    self.store.add_background_paths(&paths);
                }
                TaskResult::Uploaded {
                    files,
                    response,
                    listing,
                } => {
                    let api_base = self.client.api_base();
                    let uploaded: Vec<String> = response
                        .uploaded_paths()
                        .iter()
                        .map(|p| to_absolute_url(p, api_base))
                        .collect();
                    self.store.add_background_paths(&uploaded);
                    let paths: Vec<&str> = listing.iter().map(|b| b.path.as_str()).collect();
                    self.store.add_background_paths(&paths);

                    self.status = if response.ok {
                        format!("Uploaded {} file(s).", files)
                    } else {
                        format!("Upload failed: {}", response.errors.join("; "))
                    };
                }
                TaskResult::Deleted { name, response } => {
                    if response.ok {
                        self.store.remove_background(&name);
                        self.status = format!("Deleted {}", name);
                        if self
                            .inspector
                            .chosen
                            .as_deref()
                            .is_some_and(|p| file_key(p) == name.to_lowercase())
                        {
                            self.inspector.chosen = None;
                        }
                    } else {
                        let error = response.error.unwrap_or_else(|| "unknown error".to_string());
                        log::error!("Failed to delete {}: {}", name, error);
                        self.status = format!("Delete failed: {}", error);
                    }
                }
                TaskResult::Imported { path, result } => match result {
                    Ok(items) => {
                        self.status = format!("Imported {} lines", items.len());
                        self.store.set_items(items);
                        self.inspector.close();
                        self.preview = None;
                    }
                    Err(e) => {
                        log::error!("Failed to import {}: {}", path.display(), e);
                        self.status = format!("Import failed: {}", e);
                    }
                },
                TaskResult::Rendered { token, report } => {
                    self.session.finish(token, report);
                }
                TaskResult::Failed(message) => {
                    self.status = format!("Background task failed: {}", message);
                }
                TaskResult::PreviewLoaded { source, result } => {
                    // Ignore previews the inspector has moved away from
                    if !matches!(&self.preview, Some((current, _)) if *current == source) {
                        continue;
                    }
                    let image = match result {
                        Ok(loaded) => {
                            let size = [loaded.width as usize, loaded.height as usize];
                            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
                            PreviewImage::Ready(ctx.load_texture(
                                "background_preview",
                                color_image,
                                egui::TextureOptions::LINEAR,
                            ))
                        }
                        Err(e) => {
                            log::warn!("No preview for {}: {}", source.label(), e);
                            PreviewImage::Placeholder("Preview unavailable".to_string())
                        }
                    };
                    self.preview = Some((source, image));
                }
            }
        }
    }

    /// Lay out the whole editor for one frame.
    fn compose(&mut self, ctx: &egui::Context) {
        if !self.started {
            self.started = true;
            self.refresh_library(ctx);
        }

        self.drain_tasks(ctx);

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(
                    ui,
                    self.store.library().len(),
                    self.store.selected_count(),
                    self.pending > 0,
                    self.session.running,
                    &self.status,
                )
            })
            .inner;

        match toolbar_action {
            ToolbarAction::ImportScript => self.import_script(ctx),
            ToolbarAction::UploadBackgrounds => self.upload_backgrounds(ctx),
            ToolbarAction::RefreshLibrary => self.refresh_library(ctx),
            ToolbarAction::Render => self.start_render(ctx),
            ToolbarAction::None => {}
        }

        // Render results (bottom)
        if self.session.visible || !self.session.logs.is_empty() {
            let results_action = egui::TopBottomPanel::bottom("results")
                .resizable(true)
                .show(ctx, |ui| results::show(ui, &self.session))
                .inner;
            if let ResultsAction::Hide = results_action {
                self.session.hide();
            }
        }

        // Inspector (right side)
        let inspected = self
            .inspector
            .item_id
            .as_deref()
            .and_then(|id| self.store.item(id))
            .cloned();
        if let Some(item) = inspected {
            let source = self.inspector.preview_source(&item);
            self.request_preview(ctx, source);

            let none = PreviewImage::None;
            let preview_image = self.preview.as_ref().map_or(&none, |(_, image)| image);
            let inspector_action = egui::SidePanel::right("inspector")
                .default_width(420.0)
                .show(ctx, |ui| {
                    inspector::show(
                        ui,
                        &mut self.inspector,
                        &item,
                        self.store.library(),
                        self.store.selected_count(),
                        preview_image,
                    )
                })
                .inner;
            self.handle_inspector(ctx, &item, inspector_action);
        } else if self.inspector.item_id.is_some() {
            self.inspector.close();
        }

        // Items table (center)
        let table_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                items_table::show(ui, &self.store, &mut self.query, self.inspector.item_id.as_deref())
            })
            .inner;

        match table_action {
            TableAction::SetSelected(id, checked) => self.store.toggle_select(&id, Some(checked)),
            TableAction::SelectMany(ids) => self.store.select_many(ids),
            TableAction::Edit(id) => self.inspector.open(id),
            TableAction::None => {}
        }

        let revision = self.store.revision();
        if revision != self.seen_revision {
            log::debug!(
                "Store revision {}: {} items, {} selected, {} backgrounds",
                revision,
                self.store.items().len(),
                self.store.selected_count(),
                self.store.library().len()
            );
            self.seen_revision = revision;
        }
    }

    fn handle_inspector(&mut self, ctx: &egui::Context, item: &Item, action: InspectorAction) {
        match action {
            InspectorAction::Update(patch) => {
                self.store.update_item(&item.id, patch);
            }
            InspectorAction::ApplyToCurrent(path) => {
                self.store
                    .update_item(&item.id, ItemPatch::Background(BackgroundRef::Server(path)));
            }
            InspectorAction::ApplyToSelection(path) => {
                self.store
                    .attach_background_to_selection(AttachBackground::path(path));
            }
            InspectorAction::ClearSelectionBackground => {
                self.store.attach_background_to_selection(AttachBackground::clear());
            }
            InspectorAction::PickLocalFile => {
                if let Some(file) = rfd::FileDialog::new()
                    .add_filter("Media", &ALLOWED_EXTENSIONS)
                    .pick_file()
                {
                    self.inspector.chosen = None;
                    self.store.attach_background_to_selection(AttachBackground::file(file));
                }
            }
            InspectorAction::DeleteBackground(name) => self.delete_background(ctx, name),
            InspectorAction::Close => self.inspector.close(),
            InspectorAction::None => {}
        }
    }

    /// Full-window fallback shown after a UI crash.
    fn show_recovery(&mut self, ctx: &egui::Context, message: &str) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.centered_and_justified(|ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.heading(
                        egui::RichText::new("Something went wrong")
                            .size(24.0)
                            .color(egui::Color32::from_gray(220)),
                    );
                    ui.add_space(8.0);
                    ui.label(egui::RichText::new(message).color(egui::Color32::from_gray(160)));
                    ui.add_space(16.0);
                    if ui.button("Reload").clicked() {
                        self.reload();
                    }
                });
            });
        });
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown error".to_string()
    }
}

impl eframe::App for StoryboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(message) = self.crash.clone() {
            self.show_recovery(ctx, &message);
            return;
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.compose(ctx)));
        if let Err(payload) = outcome {
            let message = panic_message(payload.as_ref());
            log::error!("UI crash: {}", message);
            self.crash = Some(message);
            ctx.request_repaint();
        }

        if self.pending > 0 || self.session.running {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_task_passes_result_through() {
        let result = run_task(|| TaskResult::LibraryListed(Vec::new()), TaskResult::Failed);
        assert!(matches!(result, TaskResult::LibraryListed(listing) if listing.is_empty()));
    }

    #[test]
    fn test_run_task_reports_panics() {
        let result = run_task(|| panic!("decoder exploded"), TaskResult::Failed);
        assert!(matches!(result, TaskResult::Failed(message) if message == "decoder exploded"));
    }

    #[test]
    fn test_panicked_render_still_finishes_session() {
        let mut session = RenderSession::default();
        let token = session.begin();

        let result = run_task(
            || panic!("backend gone"),
            |message| TaskResult::Rendered {
                token,
                report: RenderReport {
                    outputs: Vec::new(),
                    logs: vec![format!("render error: {}", message)],
                },
            },
        );
        let TaskResult::Rendered { token, report } = result else {
            panic!("expected a render result");
        };

        assert!(session.finish(token, report));
        assert!(!session.running);
        assert_eq!(session.logs, vec!["render error: backend gone".to_string()]);
    }
}
