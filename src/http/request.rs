//! Request parsing.
//!
//! # Responsibilities
//! - Split a raw buffer into request line, headers, and body
//! - Validate method, URI, and HTTP version
//! - Collect headers with their case preserved as received
//!
//! # Design Decisions
//! - Any validation failure returns the malformed sentinel (empty method);
//!   the session turns that into a 400
//! - Header lines without a colon are ignored, not rejected
//! - Headers are kept in a `BTreeMap` so iteration order is deterministic
//! - The body stays raw bytes; handlers that want text decode it themselves

use std::collections::BTreeMap;

/// A parsed HTTP request.
///
/// The malformed sentinel is a `Request` whose `method` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub uri: String,
    pub http_version: String,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl Request {
    /// True when parsing failed and this is the sentinel value.
    pub fn is_malformed(&self) -> bool {
        self.method.is_empty()
    }
}

/// Parse raw request bytes into a `Request`.
///
/// The buffer is split on the first `\r\n\r\n`; everything after it is taken
/// as the body, however much of it was buffered. Returns the malformed
/// sentinel on any validation failure.
pub fn parse_request(raw: &[u8]) -> Request {
    let header_end = match find_header_end(raw) {
        Some(pos) => pos,
        None => return Request::default(),
    };

    let header_part = match std::str::from_utf8(&raw[..header_end]) {
        Ok(text) => text,
        Err(_) => return Request::default(),
    };
    let body = raw[header_end + 4..].to_vec();

    let mut lines = header_part.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));

    // Request line: exactly three space-separated fields.
    let request_line = match lines.next() {
        Some(line) => line,
        None => return Request::default(),
    };
    let fields: Vec<&str> = request_line.split_whitespace().collect();
    let [method, uri, http_version] = match fields.as_slice() {
        [m, u, v] => [*m, *u, *v],
        _ => return Request::default(),
    };

    if method.is_empty() || !method.bytes().all(|b| b.is_ascii_uppercase()) {
        return Request::default();
    }
    if !uri.starts_with('/') {
        return Request::default();
    }
    if http_version != "HTTP/1.0" && http_version != "HTTP/1.1" {
        return Request::default();
    }

    let mut headers = BTreeMap::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            let value = value.strip_prefix(' ').unwrap_or(value);
            headers.insert(key.to_string(), value.to_string());
        }
        // Lines without a colon are ignored.
    }

    Request {
        method: method.to_string(),
        uri: uri.to_string(),
        http_version: http_version.to_string(),
        headers,
        body,
    }
}

fn find_header_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|window| window == b"\r\n\r\n")
}
