//! Health check handler.

use std::collections::HashMap;

use super::Handler;
use crate::http::{Request, Response};

pub struct HealthHandler;

impl HealthHandler {
    pub fn create(_args: &HashMap<String, String>) -> Option<Box<dyn Handler>> {
        Some(Box::new(HealthHandler))
    }
}

impl Handler for HealthHandler {
    /// Always 200 OK with "OK", mirroring the request's HTTP version.
    fn handle(&self, req: &Request) -> Response {
        let mut res = Response::plain_text(200, "OK", "OK");
        res.http_version = req.http_version.clone();
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::parse_request;

    #[test]
    fn test_health_returns_ok() {
        let req = parse_request(b"GET /health HTTP/1.0\r\n\r\n");
        let res = HealthHandler.handle(&req);
        assert_eq!(res.status_code, 200);
        assert_eq!(res.body, b"OK");
        assert_eq!(res.http_version, "HTTP/1.0");
    }
}
