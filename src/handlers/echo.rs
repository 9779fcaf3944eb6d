//! Echo handler: reflects the request back as plain text.

use std::collections::HashMap;

use super::Handler;
use crate::http::{Request, Response};

pub struct EchoHandler;

impl EchoHandler {
    pub fn create(_args: &HashMap<String, String>) -> Option<Box<dyn Handler>> {
        Some(Box::new(EchoHandler))
    }
}

impl Handler for EchoHandler {
    fn handle(&self, req: &Request) -> Response {
        let mut body =
            format!("{} {} {}\r\n", req.method, req.uri, req.http_version).into_bytes();
        for (key, value) in &req.headers {
            body.extend_from_slice(format!("{key}: {value}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&req.body);

        let mut res = Response::plain_text(200, "OK", "");
        res.headers
            .insert("Content-Length".to_string(), body.len().to_string());
        res.body = body;
        res
    }
}
