//! Accept loop.
//!
//! # Responsibilities
//! - Bind the configured port on all interfaces
//! - Spawn one session task per accepted connection
//! - Survive transient accept errors

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::handlers::HandlerRegistry;
use crate::net::Session;
use crate::routing::RoutingTable;

#[derive(Debug, Error)]
pub enum AcceptorError {
    #[error("failed to bind port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },
}

/// Owns the listening socket and the shared request-path state.
pub struct Acceptor {
    listener: TcpListener,
    routes: Arc<RoutingTable>,
    registry: Arc<HandlerRegistry>,
}

impl Acceptor {
    /// Bind `0.0.0.0:<port>`.
    pub async fn bind(
        port: u16,
        routes: Arc<RoutingTable>,
        registry: Arc<HandlerRegistry>,
    ) -> Result<Self, AcceptorError> {
        let listener = TcpListener::bind(("0.0.0.0", port))
            .await
            .map_err(|source| AcceptorError::Bind { port, source })?;
        tracing::info!(port, routes = routes.entries().len(), "server listening");
        Ok(Self {
            listener,
            routes,
            registry,
        })
    }

    /// The locally bound address (useful when binding port 0 in tests).
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections forever. Each connection runs as its own task so
    /// a slow handler never stalls the accept loop.
    pub async fn run(self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    tracing::debug!(client = %peer, "connection accepted");
                    let session = Session::new(
                        stream,
                        peer,
                        Arc::clone(&self.routes),
                        Arc::clone(&self.registry),
                    );
                    tokio::spawn(session.run());
                }
                Err(error) => {
                    tracing::warn!(%error, "failed to accept connection");
                }
            }
        }
    }
}
