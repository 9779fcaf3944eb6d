//! HTTP wire protocol handling.
//!
//! # Data Flow
//! ```text
//! Raw bytes from a session's read buffer
//!     → request.rs (frame split, request-line validation, header parse)
//!     → [session dispatches to a handler]
//!     → response.rs (status line + headers + body serialization)
//!     → Written back to the socket
//! ```
//!
//! # Design Decisions
//! - HTTP/1.0 and HTTP/1.1 only; one exchange per connection, no keep-alive
//! - The end of the header block is treated as the end of the request; the
//!   body is whatever bytes happened to be buffered past it (no
//!   Content-Length-driven read-more loop)
//! - Parse failure yields a sentinel request with an empty method rather
//!   than an error type; callers check `is_malformed`

pub mod request;
pub mod response;

pub use request::{parse_request, Request};
pub use response::{serialize_response, Response};
