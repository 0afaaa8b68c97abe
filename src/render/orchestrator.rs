// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Batch render orchestration.
//!
//! Maps the selected items to render jobs, submits them as one batch, and
//! turns the response into output links annotated with the renderer's
//! resolved style. Results live in a [`RenderSession`] that is reset each
//! time a render starts.

use crate::api::client::RenderBackend;
use crate::api::models::{RenderBatchRequest, RenderOutput};
use crate::api::output_url;
use crate::models::item::{Item, StyleDefaults};
use crate::models::job::{map_job, JobInput};
use serde_json::Value;
use std::fmt::Write as _;

/// Batch-level options sent alongside the jobs.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub out_dir: Option<String>,
    pub debug: bool,
    pub defaults: StyleDefaults,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            out_dir: None,
            debug: true,
            defaults: StyleDefaults::default(),
        }
    }
}

/// How the renderer interpreted a job, for comparison with the editor's
/// intent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputTrace {
    pub canvas_h: Option<u32>,
    pub font_size: Option<f64>,
    pub line_gap: Option<f64>,
    pub margin: Option<f64>,
    pub mode: Option<String>,
    pub scale: Option<f64>,
    pub baseline: Option<f64>,
    /// The font size the renderer received, as sent.
    pub in_font: Option<Value>,
}

impl OutputTrace {
    pub fn from_output(output: &RenderOutput) -> Self {
        let resolved = output.style_resolved.clone().unwrap_or_default();
        let in_font = output.style_in.as_ref().and_then(|style_in| {
            ["font_size", "font_vh"]
                .iter()
                .filter_map(|key| style_in.get(key))
                .find(|value| !value.is_null())
                .cloned()
        });
        Self {
            canvas_h: output.canvas.as_ref().and_then(|canvas| canvas.h),
            font_size: resolved.font_size,
            line_gap: resolved.line_gap,
            margin: resolved.margin,
            mode: resolved.mode,
            scale: resolved.scale,
            baseline: resolved.baseline_h,
            in_font,
        }
    }

    /// One-line description, e.g. `fs=114px, gap=14, margin=171, H=1920, mode=vh, ×1.00`.
    pub fn summary(&self) -> String {
        fn show<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map_or_else(|| "?".to_string(), T::to_string)
        }
        let mut out = format!(
            "fs={}px, gap={}, margin={}, H={}, mode={}, ×{:.2}",
            show(&self.font_size),
            show(&self.line_gap),
            show(&self.margin),
            show(&self.canvas_h),
            show(&self.mode),
            self.scale.unwrap_or(1.0),
        );
        if let Some(in_font) = &self.in_font {
            let _ = write!(out, ", in={}", in_font);
        }
        out
    }
}

/// A rendered file the user can open.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedOutput {
    pub id: String,
    pub url: String,
    pub trace: OutputTrace,
}

/// Everything one render invocation produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderReport {
    pub outputs: Vec<RenderedOutput>,
    pub logs: Vec<String>,
}

/// Build the batch request for `items`.
pub fn build_request(items: &[Item], options: &RenderOptions, api_base: &str) -> RenderBatchRequest {
    let jobs = items
        .iter()
        .map(|item| map_job(&JobInput::from(item), &options.defaults, api_base))
        .collect();
    RenderBatchRequest {
        jobs,
        out_dir: options.out_dir.clone().filter(|dir| !dir.is_empty()),
        debug: options.debug,
    }
}

/// Render `items` in one batch.
///
/// A failed request yields no outputs and the failure text as the only log
/// line; nothing is retried.
pub fn start_render(backend: &dyn RenderBackend, items: &[Item], options: &RenderOptions) -> RenderReport {
    if items.is_empty() {
        return RenderReport::default();
    }

    let api_base = backend.api_base();
    let request = build_request(items, options, api_base);
    let response = backend.render_batch(&request);

    if response.ok == Some(false) {
        log::warn!("Render batch failed: {}", response.logs.join(" | "));
        return RenderReport {
            outputs: Vec::new(),
            logs: response.logs,
        };
    }

    let outputs: Vec<RenderedOutput> = response
        .outputs
        .iter()
        .map(|output| RenderedOutput {
            id: output.id.clone().unwrap_or_default(),
            url: output_url(output.path.as_deref().unwrap_or_default(), api_base),
            trace: OutputTrace::from_output(output),
        })
        .collect();
    log::info!("Render batch produced {} output(s)", outputs.len());

    RenderReport {
        outputs,
        logs: response.logs,
    }
}

/// Identifies one render invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RenderToken(u64);

/// Transient results of the most recent render.
///
/// Only the latest invocation may publish results; a response that arrives
/// after a newer render started is dropped.
#[derive(Debug, Default)]
pub struct RenderSession {
    pub outputs: Vec<RenderedOutput>,
    /// Accumulated across renders.
    pub logs: Vec<String>,
    pub visible: bool,
    pub running: bool,
    latest: u64,
}

impl RenderSession {
    /// Start a new invocation, discarding previous outputs.
    pub fn begin(&mut self) -> RenderToken {
        self.latest += 1;
        self.outputs.clear();
        self.visible = true;
        self.running = true;
        RenderToken(self.latest)
    }

    pub fn is_current(&self, token: RenderToken) -> bool {
        token.0 == self.latest
    }

    /// Publish a finished invocation. Returns `false` if it was superseded.
    pub fn finish(&mut self, token: RenderToken, report: RenderReport) -> bool {
        if !self.is_current(token) {
            log::info!("Dropping stale render results ({:?})", token);
            return false;
        }
        self.running = false;
        self.outputs = report.outputs;
        self.logs.extend(report.logs);
        true
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{BackgroundInfo, DeleteResponse, RenderBatchResponse, UploadResponse};
    use crate::io::import::import_lines;
    use crate::models::item::{BackgroundRef, ItemPatch};
    use crate::models::store::Store;
    use serde_json::json;
    use std::path::PathBuf;
    use std::sync::Mutex;

    const BASE: &str = "http://127.0.0.1:8000";

    /// Backend double that records requests and replays a canned response.
    struct FakeBackend {
        response: RenderBatchResponse,
        requests: Mutex<Vec<Value>>,
    }

    impl FakeBackend {
        fn new(response: RenderBatchResponse) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl RenderBackend for FakeBackend {
        fn api_base(&self) -> &str {
            BASE
        }

        fn list_backgrounds(&self) -> Vec<BackgroundInfo> {
            Vec::new()
        }

        fn upload_backgrounds(&self, _files: &[PathBuf]) -> UploadResponse {
            UploadResponse::default()
        }

        fn delete_background(&self, _name: &str) -> DeleteResponse {
            DeleteResponse::default()
        }

        fn render_batch(&self, request: &RenderBatchRequest) -> RenderBatchResponse {
            self.requests
                .lock()
                .unwrap()
                .push(serde_json::to_value(request).unwrap());
            self.response.clone()
        }
    }

    fn items() -> Vec<Item> {
        import_lines("first\nsecond", &StyleDefaults::default())
    }

    fn success_response(ids: &[&str]) -> RenderBatchResponse {
        serde_json::from_value(json!({
            "ok": true,
            "outputs": ids.iter().map(|id| json!({
                "id": id,
                "path": format!("/static/renders/{}.png", id),
                "canvas": {"w": 1080, "h": 1920},
                "style_resolved": {"mode": "vh", "font_size": 114, "line_gap": 14,
                                   "margin": 171, "baseline_h": 0, "scale": 1.0},
                "style_in": {"font_size": 64, "font_vh": 5.925}
            })).collect::<Vec<_>>(),
            "logs": ["rendered"]
        }))
        .unwrap()
    }

    #[test]
    fn test_request_carries_one_job_per_item() {
        let items = items();
        let backend = FakeBackend::new(success_response(&[]));
        start_render(&backend, &items, &RenderOptions::default());

        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let jobs = requests[0]["jobs"].as_array().unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0]["id"], items[0].id.as_str());
        assert_eq!(jobs[1]["text"], "second");
        assert_eq!(requests[0]["debug"], true);
        assert!(requests[0].get("outDir").is_none());
    }

    #[test]
    fn test_outputs_are_absolute_and_traced() {
        let items = items();
        let ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
        let backend = FakeBackend::new(success_response(&ids));

        let report = start_render(&backend, &items, &RenderOptions::default());
        assert_eq!(report.outputs.len(), 2);
        assert_eq!(report.logs, vec!["rendered"]);

        let first = &report.outputs[0];
        assert_eq!(first.id, items[0].id);
        assert_eq!(first.url, format!("{}/static/renders/{}.png", BASE, items[0].id));
        assert_eq!(first.trace.canvas_h, Some(1920));
        assert_eq!(first.trace.font_size, Some(114.0));
        assert_eq!(first.trace.mode.as_deref(), Some("vh"));
        assert_eq!(first.trace.in_font, Some(json!(64)));
        assert_eq!(
            first.trace.summary(),
            "fs=114px, gap=14, margin=171, H=1920, mode=vh, ×1.00, in=64"
        );
    }

    #[test]
    fn test_failure_becomes_single_log_line() {
        let backend = FakeBackend::new(RenderBatchResponse::failed("500 Internal Server Error"));
        let report = start_render(&backend, &items(), &RenderOptions::default());
        assert!(report.outputs.is_empty());
        assert_eq!(report.logs, vec!["500 Internal Server Error"]);
    }

    #[test]
    fn test_nothing_selected_sends_nothing() {
        let backend = FakeBackend::new(success_response(&[]));
        let report = start_render(&backend, &[], &RenderOptions::default());
        assert_eq!(report, RenderReport::default());
        assert!(backend.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn test_selected_backgrounds_are_server_relative() {
        let mut store = Store::new();
        store.set_items(items());
        let id = store.items()[1].id.clone();
        store.update_item(
            &id,
            ItemPatch::Background(BackgroundRef::Server(format!("{}/static/backgrounds/sea.png", BASE))),
        );
        store.toggle_select(&id, None);

        let options = RenderOptions {
            out_dir: Some("renders/today".into()),
            ..RenderOptions::default()
        };
        let request = build_request(&store.selected_items(), &options, BASE);
        assert_eq!(request.jobs.len(), 1);
        assert_eq!(request.jobs[0].background.as_deref(), Some("/static/backgrounds/sea.png"));
        assert_eq!(request.out_dir.as_deref(), Some("renders/today"));
    }

    #[test]
    fn test_stale_results_are_dropped() {
        let mut session = RenderSession::default();
        let first = session.begin();
        let second = session.begin();

        let stale = RenderReport {
            outputs: vec![RenderedOutput {
                id: "old".into(),
                url: "u".into(),
                trace: OutputTrace::default(),
            }],
            logs: vec!["old".into()],
        };
        assert!(!session.finish(first, stale));
        assert!(session.outputs.is_empty());
        assert!(session.running);

        assert!(session.finish(second, RenderReport { outputs: Vec::new(), logs: vec!["new".into()] }));
        assert!(!session.running);
        assert_eq!(session.logs, vec!["new"]);
    }

    #[test]
    fn test_begin_discards_previous_outputs() {
        let mut session = RenderSession::default();
        let token = session.begin();
        session.finish(
            token,
            RenderReport {
                outputs: vec![RenderedOutput {
                    id: "a".into(),
                    url: "u".into(),
                    trace: OutputTrace::default(),
                }],
                logs: Vec::new(),
            },
        );
        session.hide();
        assert_eq!(session.outputs.len(), 1);

        session.begin();
        assert!(session.outputs.is_empty());
        assert!(session.visible);
    }
}
