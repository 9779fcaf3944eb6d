//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! Config file text
//!     → tokenizer.rs (character state machine → token stream)
//!     → parser.rs (token stream → tree of statements and nested blocks)
//!     → interpreter.rs (tree → listen port + validated route entries)
//!     → Frozen into the immutable routing table at startup
//! ```
//!
//! # Design Decisions
//! - Custom block grammar (nginx-style directives), not TOML/JSON
//! - Parsing aborts on the first lexical or grammar violation; no partial
//!   tree is ever handed to the interpreter
//! - All configuration errors are fatal at startup; the process never starts
//!   with a half-valid routing table

pub mod interpreter;
pub mod parser;
pub mod tokenizer;

pub use interpreter::{extract_route_entries, find_listen_port, RouteEntry};
pub use parser::{parse_config, Block, Statement};

use thiserror::Error;

/// Error type covering every way a configuration can be rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("unterminated quoted string at end of config")]
    UnterminatedQuote,
    #[error("config syntax error: {0}")]
    Syntax(String),
    #[error("no valid '{0}' directive found in config")]
    MissingDirective(&'static str),
    #[error("invalid port number in 'listen' directive: {0:?}")]
    InvalidPort(String),
    #[error("trailing slash in location uri: {0}")]
    TrailingSlash(String),
    #[error("duplicate locations defined in config: {0}")]
    DuplicateLocation(String),
    #[error("handler type {0} not supported")]
    UnknownHandler(String),
    #[error("{handler} requires a '{directive}' directive in its block")]
    MissingHandlerDirective {
        handler: String,
        directive: &'static str,
    },
}
