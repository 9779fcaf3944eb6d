//! Response construction and serialization.
//!
//! # Responsibilities
//! - Represent a response as status line + headers + body
//! - Serialize to wire bytes exactly as stored
//!
//! # Design Decisions
//! - Serialization injects nothing: Content-Length and Connection are the
//!   caller's responsibility
//! - Headers serialize in map order (`BTreeMap`), which keeps output
//!   deterministic and byte-for-byte testable

use std::collections::BTreeMap;

/// An HTTP response under construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub http_version: String,
    pub status_code: u16,
    pub reason_phrase: String,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    /// A text/plain response with Content-Length filled in.
    pub fn plain_text(status_code: u16, reason_phrase: &str, body: &str) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "text/plain".to_string());
        headers.insert("Content-Length".to_string(), body.len().to_string());
        Self {
            http_version: "HTTP/1.1".to_string(),
            status_code,
            reason_phrase: reason_phrase.to_string(),
            headers,
            body: body.as_bytes().to_vec(),
        }
    }

    /// A 200 text/html response with Content-Length filled in.
    pub fn html(body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "text/html".to_string());
        headers.insert("Content-Length".to_string(), body.len().to_string());
        Self {
            http_version: "HTTP/1.1".to_string(),
            status_code: 200,
            reason_phrase: "OK".to_string(),
            headers,
            body: body.into_bytes(),
        }
    }
}

/// Serialize a response to wire bytes: status line, each header in map
/// order, a blank line, then the body verbatim.
pub fn serialize_response(res: &Response) -> Vec<u8> {
    let mut out = Vec::with_capacity(res.body.len() + 128);
    out.extend_from_slice(
        format!(
            "{} {} {}\r\n",
            res.http_version, res.status_code, res.reason_phrase
        )
        .as_bytes(),
    );
    for (key, value) in &res.headers {
        out.extend_from_slice(format!("{key}: {value}\r\n").as_bytes());
    }
    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(&res.body);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_byte_for_byte() {
        let mut res = Response {
            http_version: "HTTP/1.1".to_string(),
            status_code: 200,
            reason_phrase: "OK".to_string(),
            headers: BTreeMap::new(),
            body: b"<h1>Hello</h1>".to_vec(),
        };
        res.headers
            .insert("Content-Length".to_string(), "13".to_string());
        res.headers
            .insert("Content-Type".to_string(), "text/html".to_string());

        let expected = "HTTP/1.1 200 OK\r\nContent-Length: 13\r\nContent-Type: text/html\r\n\r\n<h1>Hello</h1>";
        assert_eq!(serialize_response(&res), expected.as_bytes());
    }

    #[test]
    fn test_no_headers_injected() {
        let res = Response {
            http_version: "HTTP/1.0".to_string(),
            status_code: 404,
            reason_phrase: "Not Found".to_string(),
            headers: BTreeMap::new(),
            body: Vec::new(),
        };
        assert_eq!(serialize_response(&res), b"HTTP/1.0 404 Not Found\r\n\r\n");
    }

    #[test]
    fn test_plain_text_helper_sets_length() {
        let res = Response::plain_text(400, "Bad Request", "Bad Request");
        assert_eq!(res.headers["Content-Length"], "11");
        assert_eq!(res.headers["Content-Type"], "text/plain");
        assert_eq!(res.body, b"Bad Request");
    }

    #[test]
    fn test_body_written_verbatim() {
        let mut res = Response::plain_text(200, "OK", "");
        res.body = vec![0x00, 0xff, 0x7f];
        let bytes = serialize_response(&res);
        assert!(bytes.ends_with(&[0x00, 0xff, 0x7f]));
    }
}
