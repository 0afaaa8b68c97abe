// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Read from `storyboard.yaml` in the working directory (or the file named by
//! `STORYBOARD_CONFIG`). Every field has a default, so the file is optional.
//! `STORYBOARD_API_BASE` overrides the backend address.

use crate::models::item::StyleDefaults;
use crate::render::orchestrator::RenderOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "storyboard.yaml";
pub const CONFIG_ENV: &str = "STORYBOARD_CONFIG";
pub const API_BASE_ENV: &str = "STORYBOARD_API_BASE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Rendering backend address, without a trailing slash.
    pub api_base: String,
    pub request_timeout_secs: u64,
    /// Ask the renderer to stamp its resolved style onto each output.
    pub debug_render: bool,
    /// Output directory passed to the renderer; its default when unset.
    pub out_dir: Option<String>,
    pub style: StyleDefaults,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 120,
            debug_render: true,
            out_dir: None,
            style: StyleDefaults::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location and the environment.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let config = if path.exists() {
            Self::from_file(&path)?
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        Ok(config.with_api_base_override(std::env::var(API_BASE_ENV).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_yaml(&yaml)
            .with_context(|| format!("invalid config {}", path.display()))?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config.normalized())
    }

    fn with_api_base_override(mut self, api_base: Option<String>) -> Self {
        if let Some(api_base) = api_base.filter(|s| !s.trim().is_empty()) {
            self.api_base = api_base;
        }
        self.normalized()
    }

    fn normalized(mut self) -> Self {
        self.api_base = self.api_base.trim().trim_end_matches('/').to_string();
        if self.api_base.is_empty() {
            self.api_base = Self::default().api_base;
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = Self::default().request_timeout_secs;
        }
        self.style = self.style.validated();
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            out_dir: self.out_dir.clone(),
            debug: self.debug_render,
            defaults: self.style.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::item::Position;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = AppConfig::from_yaml("{}").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_yaml() {
        let config = AppConfig::from_yaml(
            "api_base: http://render.local:9000/\nstyle:\n  font_size: 72\n  position: top\n",
        )
        .unwrap();
        assert_eq!(config.api_base, "http://render.local:9000");
        assert_eq!(config.style.font_size, 72.0);
        assert_eq!(config.style.position, Position::Top);
        assert_eq!(config.style.margin, 96.0);
        assert!(config.debug_render);
    }

    #[test]
    fn test_invalid_style_values_fall_back() {
        let config = AppConfig::from_yaml("style:\n  font_size: -5\n  line_gap: -1\n").unwrap();
        assert_eq!(config.style.font_size, 64.0);
        assert_eq!(config.style.line_gap, 8.0);
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        assert!(AppConfig::from_yaml("api_base: [unclosed").is_err());
    }

    #[test]
    fn test_api_base_override() {
        let config = AppConfig::default().with_api_base_override(Some("http://10.0.0.2:8000/".into()));
        assert_eq!(config.api_base, "http://10.0.0.2:8000");

        let config = AppConfig::default().with_api_base_override(Some("  ".into()));
        assert_eq!(config.api_base, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_render_options() {
        let config = AppConfig {
            out_dir: Some("static/renders/batch".into()),
            debug_render: false,
            ..AppConfig::default()
        };
        let options = config.render_options();
        assert_eq!(options.out_dir.as_deref(), Some("static/renders/batch"));
        assert!(!options.debug);
    }
}
