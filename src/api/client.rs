// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Blocking HTTP client for the rendering backend.
//!
//! Calls are made from worker threads, never from the UI thread. Transport
//! and backend failures are folded into the documented fallback shapes so
//! callers always get a value back.

use super::models::{
    BackgroundInfo, DeleteResponse, RenderBatchRequest, RenderBatchResponse, UploadResponse,
};
use anyhow::{anyhow, Context, Result};
use reqwest::blocking::{multipart, Client, Response};
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

/// Operations the editor needs from the rendering backend.
pub trait RenderBackend: Send + Sync {
    /// Base URL that relative asset paths are resolved against.
    fn api_base(&self) -> &str;

    /// Known backgrounds. Empty on any failure.
    fn list_backgrounds(&self) -> Vec<BackgroundInfo>;

    fn upload_backgrounds(&self, files: &[PathBuf]) -> UploadResponse;

    fn delete_background(&self, name: &str) -> DeleteResponse;

    /// Submit a batch. Failures come back as `ok: false` with one log line.
    fn render_batch(&self, request: &RenderBatchRequest) -> RenderBatchResponse;
}

/// [`RenderBackend`] over HTTP.
pub struct ApiClient {
    base: String,
    http: Client,
}

impl ApiClient {
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base: api_base.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Fetch raw bytes, e.g. a background image for preview.
    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(url)
            .send()
            .with_context(|| format!("request to {} failed", url))?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("GET {} returned {}", url, status));
        }
        Ok(response.bytes()?.to_vec())
    }

    fn try_list_backgrounds(&self) -> Result<Vec<BackgroundInfo>> {
        let response = self
            .http
            .get(self.url("/api/library/backgrounds"))
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("Background listing returned {}", status);
            return Ok(Vec::new());
        }
        Ok(response.json()?)
    }

    fn try_upload_backgrounds(&self, files: &[PathBuf]) -> Result<UploadResponse> {
        let mut form = multipart::Form::new();
        for file in files {
            form = form
                .file("files", file)
                .with_context(|| format!("failed to read {}", file.display()))?;
        }
        let response = self
            .http
            .post(self.url("/api/library/backgrounds/upload"))
            .multipart(form)
            .send()?;
        if !response.status().is_success() {
            return Ok(UploadResponse::failed(body_text(response)));
        }
        Ok(response.json()?)
    }

    fn try_delete_background(&self, name: &str) -> Result<DeleteResponse> {
        let mut url = Url::parse(&self.url("/api/library/backgrounds"))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("API base cannot hold a path: {}", self.base))?
            .push(name);
        let response = self.http.delete(url).send()?;
        if !response.status().is_success() {
            return Ok(DeleteResponse::failed(body_text(response)));
        }
        Ok(response.json()?)
    }

    fn try_render_batch(&self, request: &RenderBatchRequest) -> Result<RenderBatchResponse> {
        let response = self
            .http
            .post(self.url("/api/render/batch"))
            .json(request)
            .send()?;
        if !response.status().is_success() {
            return Ok(RenderBatchResponse::failed(body_text(response)));
        }
        Ok(response.json()?)
    }
}

fn body_text(response: Response) -> String {
    let status = response.status();
    match response.text() {
        Ok(text) if !text.is_empty() => text,
        _ => status.to_string(),
    }
}

impl RenderBackend for ApiClient {
    fn api_base(&self) -> &str {
        &self.base
    }

    fn list_backgrounds(&self) -> Vec<BackgroundInfo> {
        self.try_list_backgrounds().unwrap_or_else(|e| {
            log::warn!("Failed to list backgrounds: {:#}", e);
            Vec::new()
        })
    }

    fn upload_backgrounds(&self, files: &[PathBuf]) -> UploadResponse {
        self.try_upload_backgrounds(files).unwrap_or_else(|e| {
            log::error!("Upload failed: {:#}", e);
            UploadResponse::failed(format!("upload error: {:#}", e))
        })
    }

    fn delete_background(&self, name: &str) -> DeleteResponse {
        self.try_delete_background(name).unwrap_or_else(|e| {
            log::error!("Delete of {} failed: {:#}", name, e);
            DeleteResponse::failed(format!("delete error: {:#}", e))
        })
    }

    fn render_batch(&self, request: &RenderBatchRequest) -> RenderBatchResponse {
        log::info!("Submitting render batch with {} job(s)", request.jobs.len());
        self.try_render_batch(request).unwrap_or_else(|e| {
            log::error!("Render request failed: {:#}", e);
            RenderBatchResponse::failed(format!("fetch error: {:#}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_client() -> ApiClient {
        // Port 9 (discard) on localhost refuses connections in test sandboxes.
        ApiClient::new("http://127.0.0.1:9/", Duration::from_millis(500)).unwrap()
    }

    #[test]
    fn test_base_is_trimmed() {
        let client = unreachable_client();
        assert_eq!(client.api_base(), "http://127.0.0.1:9");
        assert_eq!(client.url("/api/x"), "http://127.0.0.1:9/api/x");
    }

    #[test]
    fn test_transport_failures_fold_into_fallbacks() {
        let client = unreachable_client();

        assert!(client.list_backgrounds().is_empty());

        let deleted = client.delete_background("a b.png");
        assert!(!deleted.ok);
        assert!(deleted.error.is_some());

        let rendered = client.render_batch(&RenderBatchRequest {
            jobs: Vec::new(),
            out_dir: None,
            debug: true,
        });
        assert_eq!(rendered.ok, Some(false));
        assert!(rendered.outputs.is_empty());
        assert_eq!(rendered.logs.len(), 1);
        assert!(rendered.logs[0].starts_with("fetch error:"));
    }

    #[test]
    fn test_upload_of_missing_file_fails_softly() {
        let client = unreachable_client();
        let response = client.upload_backgrounds(&[PathBuf::from("/definitely/not/here.png")]);
        assert!(!response.ok);
        assert_eq!(response.errors.len(), 1);
        assert!(response.paths.is_empty());
    }
}
