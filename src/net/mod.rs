//! TCP acceptance and per-connection sessions.
//!
//! # Data Flow
//! ```text
//! Acceptor::bind(port)
//!     → accept loop (listener.rs)
//!     → one spawned task per connection
//!     → Session::run (session.rs): read → dispatch → write → close
//! ```
//!
//! # Design Decisions
//! - The routing table and handler registry are built once, wrapped in
//!   `Arc`, and shared read-only; no locks on the request path
//! - A failed accept is logged and the loop continues; one bad socket
//!   never takes the server down

pub mod listener;
pub mod session;

pub use listener::Acceptor;
pub use session::Session;
