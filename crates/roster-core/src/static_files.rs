//! # Static Assets
//!
//! File delivery for `/static/*` requests, rooted at a configured
//! directory fixed at startup.
//!
//! The requested path is resolved strictly inside the root: only plain
//! path components are accepted, so `..`, absolute segments, and drive
//! prefixes can never escape it. Anything that does not resolve to a
//! regular file answers 404; bytes of an existing file are returned
//! unchanged with a content type inferred from the extension.

use crate::error::Result;
use crate::server::{Bytes, Response};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Serve one asset from `root`.
///
/// `asset` is the remainder of the request path after `/static/`, exactly
/// as the wildcard captured it.
///
/// # Errors
///
/// Missing or unresolvable files are a 404 response, not an error; only
/// unexpected I/O failures (permissions, disk faults) propagate.
pub async fn serve(root: &Path, asset: &str) -> Result<Response> {
    let Some(path) = resolve(root, asset) else {
        return Ok(not_found());
    };

    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Ok(not_found()),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(not_found()),
        Err(e) => return Err(e.into()),
    }

    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(Response::bytes(Bytes::from(bytes), content_type_for(&path))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(not_found()),
        Err(e) => Err(e.into()),
    }
}

fn not_found() -> Response {
    Response::text("Not Found").with_status(404)
}

/// Resolve an asset name under the root, rejecting everything that is not
/// made purely of normal path components.
fn resolve(root: &Path, asset: &str) -> Option<PathBuf> {
    if asset.is_empty() {
        return None;
    }

    let mut resolved = root.to_path_buf();
    for component in Path::new(asset).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            _ => return None,
        }
    }
    Some(resolved)
}

/// Infer a content type from the file extension.
///
/// Unknown extensions fall back to `application/octet-stream`.
#[must_use]
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}
