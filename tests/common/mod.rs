//! Shared helpers for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use block_server::config::{extract_route_entries, parse_config};
use block_server::{Acceptor, HandlerRegistry, RoutingTable};

/// Spawn a server built from config text, bound to an ephemeral port.
/// The configured `listen` port is validated but not used, so tests never
/// collide on ports.
pub async fn spawn_server(config_text: &str) -> SocketAddr {
    let tree = parse_config(config_text).expect("config parses");
    let entries = extract_route_entries(&tree).expect("config interprets");
    let routes = Arc::new(RoutingTable::build(entries));
    let registry = Arc::new(HandlerRegistry::with_defaults());

    let acceptor = Acceptor::bind(0, routes, registry)
        .await
        .expect("bind ephemeral port");
    let addr = acceptor.local_addr().expect("local addr");
    tokio::spawn(acceptor.run());
    addr
}

/// Send raw bytes and read the full response until the server closes.
pub async fn raw_request(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    stream.write_all(request).await.expect("write request");

    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .await
        .expect("read response");
    response
}

/// The status code from a raw response buffer.
pub fn status_of(response: &[u8]) -> u16 {
    let text = String::from_utf8_lossy(response);
    let status_line = text.lines().next().expect("status line");
    status_line
        .split_whitespace()
        .nth(1)
        .expect("status code field")
        .parse()
        .expect("numeric status")
}

/// The body after the first blank line of a raw response buffer.
#[allow(dead_code)]
pub fn body_of(response: &[u8]) -> Vec<u8> {
    let pos = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("head terminator");
    response[pos + 4..].to_vec()
}
