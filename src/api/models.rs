// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Request and response bodies exchanged with the rendering backend.

use crate::models::job::RenderJob;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of `GET /api/library/backgrounds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundInfo {
    #[serde(default)]
    pub name: String,
    pub path: String,
}

/// Result of `POST /api/library/backgrounds/upload`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadResponse {
    pub ok: bool,
    pub paths: Vec<String>,
    pub errors: Vec<String>,
    pub items: Vec<BackgroundInfo>,
}

impl UploadResponse {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            errors: vec![error.into()],
            ..Self::default()
        }
    }

    /// Paths of the stored files, taken from `paths` or, failing that,
    /// from `items`.
    pub fn uploaded_paths(&self) -> Vec<String> {
        if !self.paths.is_empty() {
            self.paths.clone()
        } else {
            self.items.iter().map(|item| item.path.clone()).collect()
        }
    }
}

/// Result of `DELETE /api/library/backgrounds/{name}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeleteResponse {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
        }
    }
}

/// Body of `POST /api/render/batch`.
#[derive(Debug, Clone, Serialize)]
pub struct RenderBatchRequest {
    pub jobs: Vec<RenderJob>,
    #[serde(rename = "outDir", skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,
    pub debug: bool,
}

/// Result of `POST /api/render/batch`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderBatchResponse {
    pub ok: Option<bool>,
    pub outputs: Vec<RenderOutput>,
    pub logs: Vec<String>,
}

impl RenderBatchResponse {
    pub fn failed(log: impl Into<String>) -> Self {
        Self {
            ok: Some(false),
            outputs: Vec::new(),
            logs: vec![log.into()],
        }
    }
}

/// One rendered file, with the renderer's view of the style it applied.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderOutput {
    pub id: Option<String>,
    pub filename: Option<String>,
    pub path: Option<String>,
    pub canvas: Option<CanvasInfo>,
    pub style_resolved: Option<StyleResolved>,
    /// Echo of the inputs the renderer read; its shape varies by mode.
    pub style_in: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasInfo {
    pub w: Option<u32>,
    pub h: Option<u32>,
}

/// Pixel values the renderer actually drew with.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleResolved {
    pub mode: Option<String>,
    pub font_size: Option<f64>,
    pub line_gap: Option<f64>,
    pub margin: Option<f64>,
    pub position: Option<String>,
    pub baseline_h: Option<f64>,
    pub scale: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_response_parses() {
        let response: RenderBatchResponse = serde_json::from_value(json!({
            "ok": true,
            "outputs": [{
                "id": "a",
                "filename": "a-1.png",
                "path": "/static/renders/a-1.png",
                "canvas": {"w": 1080, "h": 1920},
                "style_resolved": {"mode": "vh", "font_size": 114, "line_gap": 14,
                                   "margin": 171, "position": "bottom", "baseline_h": 0, "scale": 1.0},
                "style_in": {"font_vh": 5.9, "font_size": 64}
            }],
            "logs": ["done"]
        }))
        .unwrap();

        let output = &response.outputs[0];
        assert_eq!(response.ok, Some(true));
        assert_eq!(output.canvas.as_ref().and_then(|c| c.h), Some(1920));
        assert_eq!(output.style_resolved.as_ref().and_then(|s| s.font_size), Some(114.0));
        assert_eq!(response.logs, vec!["done"]);
    }

    #[test]
    fn test_upload_paths_fall_back_to_items() {
        let response: UploadResponse = serde_json::from_value(json!({
            "ok": true,
            "items": [{"name": "a.png", "path": "/static/backgrounds/a.png"}]
        }))
        .unwrap();
        assert_eq!(response.uploaded_paths(), vec!["/static/backgrounds/a.png"]);
        assert!(response.errors.is_empty());
    }

    #[test]
    fn test_request_omits_missing_out_dir() {
        let request = RenderBatchRequest {
            jobs: Vec::new(),
            out_dir: None,
            debug: true,
        };
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({"jobs": [], "debug": true}));
    }
}
