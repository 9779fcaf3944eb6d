//! Fallback handler for URIs no route matches.

use std::collections::HashMap;

use super::Handler;
use crate::http::{Request, Response};

pub struct NotFoundHandler;

impl NotFoundHandler {
    pub fn create(_args: &HashMap<String, String>) -> Option<Box<dyn Handler>> {
        Some(Box::new(NotFoundHandler))
    }
}

impl Handler for NotFoundHandler {
    fn handle(&self, _req: &Request) -> Response {
        Response::plain_text(404, "Not Found", "404 Not Found")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::parse_request;

    #[test]
    fn test_always_404() {
        let req = parse_request(b"GET /whatever HTTP/1.1\r\n\r\n");
        let res = NotFoundHandler.handle(&req);
        assert_eq!(res.status_code, 404);
        assert_eq!(res.body, b"404 Not Found");
    }
}
