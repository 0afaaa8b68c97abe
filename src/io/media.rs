// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background media loading for previews.
//!
//! Resolves a background reference (server path or local file) to decoded
//! RGBA pixels suitable for an egui texture. Video backgrounds are not
//! decoded; the preview shows a placeholder for them.

use crate::api::client::ApiClient;
use crate::api::to_absolute_url;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Longest edge of a decoded preview, in pixels.
const PREVIEW_MAX_EDGE: u32 = 960;

const VIDEO_EXTENSIONS: [&str; 7] = ["mp4", "mov", "mkv", "webm", "m4v", "avi", "gif"];

/// Decoded image ready for upload to the GPU.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Where a preview image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreviewSource {
    Server(String),
    Local(PathBuf),
}

impl PreviewSource {
    pub fn label(&self) -> String {
        match self {
            PreviewSource::Server(path) => path.clone(),
            PreviewSource::Local(path) => path.display().to_string(),
        }
    }

    pub fn is_video(&self) -> bool {
        is_video(&self.label())
    }
}

/// Whether the path looks like a video file.
pub fn is_video(path: &str) -> bool {
    let name = crate::models::library::file_name(path);
    match name.rsplit_once('.') {
        Some((_, ext)) => VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Decode encoded image bytes, downscaling large images for preview.
pub fn decode_image(bytes: &[u8]) -> Result<LoadedImage> {
    let img = image::load_from_memory(bytes).context("unsupported or corrupt image")?;
    let img = if img.width() > PREVIEW_MAX_EDGE || img.height() > PREVIEW_MAX_EDGE {
        img.thumbnail(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE)
    } else {
        img
    };
    let rgba = img.to_rgba8();
    Ok(LoadedImage {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

/// Load an image file from disk.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    decode_image(&bytes)
}

/// Fetch or read the preview image for `source`.
pub fn load_preview(source: &PreviewSource, client: &ApiClient, api_base: &str) -> Result<LoadedImage> {
    if source.is_video() {
        bail!("video backgrounds have no still preview");
    }
    match source {
        PreviewSource::Local(path) => load_image(path),
        PreviewSource::Server(path) => {
            let url = to_absolute_url(path, api_base);
            let bytes = client.fetch_bytes(&url)?;
            decode_image(&bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_small_image() {
        let loaded = decode_image(&png_bytes(4, 3)).unwrap();
        assert_eq!((loaded.width, loaded.height), (4, 3));
        assert_eq!(loaded.pixels.len(), 4 * 3 * 4);
        assert_eq!(&loaded.pixels[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_large_images_are_downscaled() {
        let loaded = decode_image(&png_bytes(1080, 1920)).unwrap();
        assert!(loaded.height <= PREVIEW_MAX_EDGE);
        assert!(loaded.width < loaded.height);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(decode_image(b"not an image").is_err());
    }

    #[test]
    fn test_video_detection() {
        assert!(is_video("/static/backgrounds/Clip.MP4"));
        assert!(is_video("loop.webm"));
        assert!(!is_video("/static/backgrounds/a.png"));
        assert!(PreviewSource::Local("/tmp/x.mov".into()).is_video());
    }
}
