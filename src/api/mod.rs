// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Rendering backend API.
//!
//! HTTP client for the background library and batch render endpoints, plus
//! the path helpers that translate between server-relative asset paths and
//! absolute URLs.

pub mod client;
pub mod models;

use crate::models::library::file_name;

/// Directory the backend serves uploaded backgrounds from.
pub const BACKGROUNDS_DIR: &str = "/static/backgrounds";

/// Whether `path` starts with a URL scheme such as `https://`.
pub fn has_scheme(path: &str) -> bool {
    match path.split_once("://") {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Normalize a background reference to a server-relative path.
///
/// - absolute paths (`/...`) are kept;
/// - URLs under `api_base` lose that prefix;
/// - anything without a scheme is treated as a bare file name in the
///   backgrounds directory;
/// - other URLs pass through untouched.
pub fn to_server_path(path: &str, api_base: &str) -> Option<String> {
    if path.is_empty() {
        return None;
    }
    if path.starts_with('/') {
        return Some(path.to_string());
    }
    if !api_base.is_empty() {
        if let Some(rest) = path.strip_prefix(api_base) {
            return (!rest.is_empty()).then(|| rest.to_string());
        }
    }
    if !has_scheme(path) {
        return Some(format!("{}/{}", BACKGROUNDS_DIR, file_name(path)));
    }
    Some(path.to_string())
}

/// Resolve a library path to a URL a viewer can open.
pub fn to_absolute_url(path: &str, api_base: &str) -> String {
    if has_scheme(path) {
        path.to_string()
    } else if path.starts_with('/') {
        format!("{}{}", api_base, path)
    } else {
        format!("{}{}/{}", api_base, BACKGROUNDS_DIR, file_name(path))
    }
}

/// Resolve a render output path to an absolute URL.
pub fn output_url(path: &str, api_base: &str) -> String {
    if has_scheme(path) {
        path.to_string()
    } else if path.starts_with('/') {
        format!("{}{}", api_base, path)
    } else {
        format!("{}/{}", api_base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://127.0.0.1:8000";

    #[test]
    fn test_to_server_path() {
        assert_eq!(to_server_path("", BASE), None);
        assert_eq!(to_server_path(BASE, BASE), None);
        assert_eq!(to_server_path("/static/backgrounds/a.png", BASE).as_deref(), Some("/static/backgrounds/a.png"));
        assert_eq!(
            to_server_path("http://127.0.0.1:8000/static/backgrounds/b.png", BASE).as_deref(),
            Some("/static/backgrounds/b.png")
        );
        assert_eq!(to_server_path("c.png", BASE).as_deref(), Some("/static/backgrounds/c.png"));
        assert_eq!(to_server_path("some/dir/d.mp4", BASE).as_deref(), Some("/static/backgrounds/d.mp4"));
        assert_eq!(to_server_path("http_clip.mp4", BASE).as_deref(), Some("/static/backgrounds/http_clip.mp4"));
        assert_eq!(
            to_server_path("https://cdn.example.com/e.png", BASE).as_deref(),
            Some("https://cdn.example.com/e.png")
        );
    }

    #[test]
    fn test_to_absolute_url() {
        assert_eq!(to_absolute_url("/static/backgrounds/a.png", BASE), format!("{}/static/backgrounds/a.png", BASE));
        assert_eq!(to_absolute_url("b.png", BASE), format!("{}/static/backgrounds/b.png", BASE));
        assert_eq!(to_absolute_url("https://x.io/c.png", BASE), "https://x.io/c.png");
    }

    #[test]
    fn test_output_url() {
        assert_eq!(output_url("/static/renders/a.png", BASE), format!("{}/static/renders/a.png", BASE));
        assert_eq!(output_url("http://other/a.png", BASE), "http://other/a.png");
    }

    #[test]
    fn test_has_scheme() {
        assert!(has_scheme("http://a"));
        assert!(has_scheme("s3+x://bucket/a"));
        assert!(!has_scheme("/static/a.png"));
        assert!(!has_scheme("weird name://x"));
        assert!(!has_scheme("a.png"));
    }
}
