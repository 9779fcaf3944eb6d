//! Block-configured HTTP server.
//!
//! A small web server driven by an nginx-style block configuration file:
//! the config names a listen port and maps URI prefixes to handlers, and
//! the server serves one request per connection.
//!
//! # Architecture Overview
//!
//! ```text
//!   config file ──▶ config (tokenize → parse → interpret)
//!                        │
//!                        ▼
//!                  routing (longest-prefix trie over route entries)
//!                        │
//!   TCP client ──▶ net (accept loop → per-connection session)
//!                        │
//!                        ▼
//!                  http (request parse / response serialize)
//!                        │
//!                        ▼
//!                  handlers (echo, static, crud, quiz, ...)
//!                        │
//!                  storage (file-backed entity store)
//! ```

pub mod config;
pub mod handlers;
pub mod http;
pub mod net;
pub mod routing;
pub mod storage;

pub use config::{extract_route_entries, find_listen_port, parse_config, ConfigError};
pub use handlers::HandlerRegistry;
pub use net::Acceptor;
pub use routing::RoutingTable;
