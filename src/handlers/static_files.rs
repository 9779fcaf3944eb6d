//! Static file serving.
//!
//! # Responsibilities
//! - Map URIs under a mount point to files under a document root
//! - Reject directory traversal
//! - Pick a Content-Type from the file extension
//!
//! # Design Decisions
//! - Everything that can't be served is a 404; no distinction is leaked
//!   between "outside mount", "traversal attempt", and "missing file"
//! - Files are read whole; no streaming (responses are one-shot anyway)

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use super::Handler;
use crate::http::{Request, Response};

pub struct StaticFileHandler {
    /// Mount point, normalized to end with '/'.
    mount_point: String,
    /// Document root, trailing '/' stripped.
    doc_root: String,
}

impl StaticFileHandler {
    pub fn new(mount_point: &str, doc_root: &str) -> Self {
        let mut mount_point = mount_point.to_string();
        if !mount_point.ends_with('/') {
            mount_point.push('/');
        }
        let doc_root = doc_root.trim_end_matches('/').to_string();
        Self {
            mount_point,
            doc_root,
        }
    }

    pub fn create(args: &HashMap<String, String>) -> Option<Box<dyn Handler>> {
        let mount_point = args.get("mount_point")?;
        let doc_root = args.get("doc_root")?;
        Some(Box::new(Self::new(mount_point, doc_root)))
    }

    fn not_found(req: &Request) -> Response {
        let mut res = Response::plain_text(404, "Not Found", "404 Not Found");
        res.http_version = req.http_version.clone();
        res
    }
}

impl Handler for StaticFileHandler {
    fn handle(&self, req: &Request) -> Response {
        let rel_path = match req.uri.strip_prefix(&self.mount_point) {
            Some(rest) => rest,
            None => {
                tracing::debug!(uri = %req.uri, mount = %self.mount_point, "uri outside mount point");
                return Self::not_found(req);
            }
        };
        if rel_path.is_empty() || rel_path == "/" {
            tracing::debug!(uri = %req.uri, "no file name given");
            return Self::not_found(req);
        }

        // Refuse any path that climbs out of the document root.
        let mut safe = PathBuf::new();
        for component in Path::new(rel_path).components() {
            match component {
                Component::ParentDir => {
                    tracing::debug!(uri = %req.uri, "parent directory in request path");
                    return Self::not_found(req);
                }
                Component::Normal(part) => safe.push(part),
                _ => {}
            }
        }

        let full = Path::new(&self.doc_root).join(&safe);
        if !full.is_file() {
            tracing::debug!(path = %full.display(), "file does not exist");
            return Self::not_found(req);
        }

        let data = match fs::read(&full) {
            Ok(data) => data,
            Err(error) => {
                tracing::warn!(path = %full.display(), %error, "failed to read file");
                return Self::not_found(req);
            }
        };

        let mime = full
            .extension()
            .and_then(|ext| ext.to_str())
            .map(mime_type)
            .unwrap_or("application/octet-stream");

        let mut res = Response {
            http_version: req.http_version.clone(),
            status_code: 200,
            reason_phrase: "OK".to_string(),
            headers: Default::default(),
            body: data,
        };
        res.headers
            .insert("Content-Type".to_string(), mime.to_string());
        res.headers
            .insert("Content-Length".to_string(), res.body.len().to_string());
        res
    }
}

fn mime_type(extension: &str) -> &'static str {
    match extension {
        "html" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "txt" => "text/plain",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}
