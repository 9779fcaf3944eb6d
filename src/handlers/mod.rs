//! Request handlers.
//!
//! # Data Flow
//! ```text
//! Session matches a route entry
//!     → registry.rs (name → constructor, args → handler instance)
//!     → handler.handle(&request) → Response
//!     → Back to the session for serialization
//! ```
//!
//! # Design Decisions
//! - One trait with one method; each handler variant implements it
//!   independently (capability dispatch, not inheritance)
//! - Constructors return `None` on missing/invalid args; the session turns
//!   that into a 500 instead of ever invoking an absent handler
//! - `handle` never panics: every failure is encoded as a `Response`

pub mod crud;
pub mod echo;
pub mod health;
pub mod not_found;
pub mod quiz;
pub mod quiz_create;
pub mod quiz_result;
pub mod registry;
pub mod sleep;
pub mod static_files;

pub use registry::HandlerRegistry;

use std::collections::HashMap;

use crate::http::{Request, Response};

/// A request handler instance, constructed per request from route args.
pub trait Handler: Send + Sync {
    /// Produce a response for the request. Must not panic — failures are
    /// encoded as responses with an appropriate status code.
    fn handle(&self, req: &Request) -> Response;
}

/// Constructor signature stored in the registry: route args in, handler out,
/// `None` when required args are missing or invalid.
pub type HandlerCtor = fn(&HashMap<String, String>) -> Option<Box<dyn Handler>>;

/// Escape text for embedding in HTML bodies.
pub(crate) fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_html;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"a" & 'b'</b>"#),
            "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
