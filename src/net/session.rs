//! Per-connection session engine.
//!
//! # Responsibilities
//! - Buffer bytes until a full request head (`\r\n\r\n`) has arrived
//! - Parse, route, and dispatch exactly one request
//! - Serialize the response and close the connection
//!
//! # Design Decisions
//! - One request per connection: `Connection: close` is forced on every
//!   response regardless of what the client asked for
//! - Handlers are synchronous and run on the blocking pool, so a slow
//!   handler never blocks the async runtime
//! - A handler that cannot be constructed yields a synthesized 500; the
//!   session never dispatches into a missing handler

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::handlers::{not_found::NotFoundHandler, Handler, HandlerRegistry};
use crate::http::{parse_request, serialize_response, Request, Response};
use crate::routing::RoutingTable;

const READ_CHUNK: usize = 1024;
const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Reading,
    Dispatching,
    Writing,
    Closed,
}

/// One accepted connection, driven from read to close.
pub struct Session {
    stream: TcpStream,
    peer: SocketAddr,
    routes: Arc<RoutingTable>,
    registry: Arc<HandlerRegistry>,
    state: SessionState,
}

impl Session {
    pub fn new(
        stream: TcpStream,
        peer: SocketAddr,
        routes: Arc<RoutingTable>,
        registry: Arc<HandlerRegistry>,
    ) -> Self {
        Self {
            stream,
            peer,
            routes,
            registry,
            state: SessionState::Reading,
        }
    }

    fn transition(&mut self, next: SessionState) {
        tracing::trace!(client = %self.peer, from = ?self.state, to = ?next, "session state");
        self.state = next;
    }

    pub async fn run(mut self) {
        let buffer = match self.read_head().await {
            Some(buffer) => buffer,
            None => {
                // Peer went away before a full head arrived.
                self.transition(SessionState::Closed);
                return;
            }
        };

        self.transition(SessionState::Dispatching);
        let req = parse_request(&buffer);
        let (mut res, handler_name) =
            dispatch(&self.routes, &self.registry, req.clone()).await;

        // One response per connection, then hang up.
        res.headers
            .insert("Connection".to_string(), "close".to_string());

        tracing::info!(
            code = res.status_code,
            path = %req.uri,
            client = %self.peer,
            handler = %handler_name,
            "request handled"
        );

        self.transition(SessionState::Writing);
        let bytes = serialize_response(&res);
        if let Err(error) = self.stream.write_all(&bytes).await {
            tracing::debug!(client = %self.peer, %error, "failed to write response");
        }
        let _ = self.stream.shutdown().await;
        self.transition(SessionState::Closed);
    }

    /// Read until the head terminator appears in the buffer. Returns `None`
    /// on EOF or a read error before the terminator.
    async fn read_head(&mut self) -> Option<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            if buffer
                .windows(HEAD_TERMINATOR.len())
                .any(|w| w == HEAD_TERMINATOR)
            {
                return Some(buffer);
            }
            match self.stream.read(&mut chunk).await {
                Ok(0) => {
                    tracing::debug!(client = %self.peer, "connection closed mid-request");
                    return None;
                }
                Ok(n) => buffer.extend_from_slice(&chunk[..n]),
                Err(error) => {
                    tracing::debug!(client = %self.peer, %error, "read failed");
                    return None;
                }
            }
        }
    }
}

/// Route the request and run its handler on the blocking pool.
///
/// Returns the response together with the handler name used, for the
/// request log line.
async fn dispatch(
    routes: &RoutingTable,
    registry: &Arc<HandlerRegistry>,
    req: Request,
) -> (Response, String) {
    if req.is_malformed() {
        return (
            Response::plain_text(400, "Bad Request", "Bad Request"),
            "(malformed)".to_string(),
        );
    }

    let (handler_name, args) = match routes.find(&req.uri) {
        Some(entry) => (entry.handler_name.clone(), entry.args.clone()),
        None => {
            let res = NotFoundHandler.handle(&req);
            return (res, "NotFoundHandler".to_string());
        }
    };

    let registry = Arc::clone(registry);
    let name = handler_name.clone();
    let joined = tokio::task::spawn_blocking(move || {
        match registry.create(&name, &args) {
            Some(handler) => handler.handle(&req),
            None => {
                tracing::error!(handler = %name, "failed to construct handler");
                Response::plain_text(
                    500,
                    "Internal Server Error",
                    "500 Internal Server Error",
                )
            }
        }
    })
    .await;

    let res = match joined {
        Ok(res) => res,
        Err(error) => {
            tracing::error!(handler = %handler_name, %error, "handler task failed");
            Response::plain_text(500, "Internal Server Error", "500 Internal Server Error")
        }
    };
    (res, handler_name)
}
