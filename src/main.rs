// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Storyboard - subtitle video batch editor
//!
//! A desktop editor for preparing batches of short captioned videos: import
//! a script, assign backgrounds from the server library, tune text style and
//! send the selection to the rendering backend.

mod api;
mod app;
mod config;
mod io;
mod models;
mod render;
mod ui;
mod util;

use anyhow::Result;
use app::StoryboardApp;
use config::AppConfig;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::error!("Failed to load configuration, using defaults: {:#}", e);
        AppConfig::default()
    });
    let app = StoryboardApp::new(config)?;

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Storyboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native("Storyboard", options, Box::new(move |_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
