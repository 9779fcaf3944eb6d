//! End-to-end tests against a running server.

mod common;

use common::{body_of, raw_request, spawn_server, status_of};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

const CONFIG: &str = r#"
listen 8080;

location /echo EchoHandler {
}

location /health HealthHandler {
}
"#;

#[tokio::test]
async fn test_echo_round_trip() {
    let addr = spawn_server(CONFIG).await;
    let request = b"GET /echo HTTP/1.1\r\nHost: test\r\n\r\n";
    let response = raw_request(addr, request).await;

    assert_eq!(status_of(&response), 200);
    let body = body_of(&response);
    assert!(body.starts_with(b"GET /echo HTTP/1.1"));
    assert!(String::from_utf8_lossy(&body).contains("Host: test"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let addr = spawn_server(CONFIG).await;
    let response = raw_request(addr, b"GET /health HTTP/1.1\r\n\r\n").await;
    assert_eq!(status_of(&response), 200);
    assert_eq!(body_of(&response), b"OK");
}

#[tokio::test]
async fn test_works_with_a_real_http_client() {
    let addr = spawn_server(CONFIG).await;
    let res = reqwest::get(format!("http://{addr}/health"))
        .await
        .expect("request succeeds");
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_unmatched_uri_is_404() {
    let addr = spawn_server(CONFIG).await;
    let response = raw_request(addr, b"GET /nowhere HTTP/1.1\r\n\r\n").await;
    assert_eq!(status_of(&response), 404);
}

#[tokio::test]
async fn test_malformed_request_is_400() {
    let addr = spawn_server(CONFIG).await;
    let response = raw_request(addr, b"definitely not http\r\n\r\n").await;
    assert_eq!(status_of(&response), 400);
}

#[tokio::test]
async fn test_connection_close_is_forced() {
    let addr = spawn_server(CONFIG).await;
    let request = b"GET /echo HTTP/1.1\r\nConnection: keep-alive\r\n\r\n";
    let response = raw_request(addr, request).await;
    assert!(String::from_utf8_lossy(&response).contains("Connection: close"));
}

#[tokio::test]
async fn test_partial_request_gets_no_response() {
    let addr = spawn_server(CONFIG).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();
    // No head terminator; the server must not dispatch.
    stream.write_all(b"GET /echo HTTP/1.1\r\n").await.unwrap();
    stream.shutdown().await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    assert!(response.is_empty());
}

#[tokio::test]
async fn test_request_split_across_writes_is_assembled() {
    let addr = spawn_server(CONFIG).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(b"GET /ec").await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    stream.write_all(b"ho HTTP/1.1\r\n\r\n").await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    assert_eq!(status_of(&response), 200);
}

#[tokio::test]
async fn test_static_files_served_from_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("hello.txt"), "hello world").unwrap();

    let config = format!(
        "listen 8080;\n\nlocation /static StaticFileHandler {{\n  root {};\n}}\n",
        dir.path().display()
    );
    let addr = spawn_server(&config).await;

    let response = raw_request(addr, b"GET /static/hello.txt HTTP/1.1\r\n\r\n").await;
    assert_eq!(status_of(&response), 200);
    assert_eq!(body_of(&response), b"hello world");
    assert!(String::from_utf8_lossy(&response).contains("Content-Type: text/plain"));

    let response = raw_request(addr, b"GET /static/missing.txt HTTP/1.1\r\n\r\n").await;
    assert_eq!(status_of(&response), 404);
}

#[tokio::test]
async fn test_crud_create_and_retrieve() {
    let dir = tempfile::tempdir().unwrap();
    let config = format!(
        "listen 8080;\n\nlocation /api CrudHandler {{\n  data_path {};\n}}\n",
        dir.path().display()
    );
    let addr = spawn_server(&config).await;

    let post = b"POST /api/Shoes HTTP/1.1\r\nContent-Type: application/json\r\n\r\n{\"size\": 10}";
    let response = raw_request(addr, post).await;
    assert_eq!(status_of(&response), 201);

    let created: serde_json::Value = serde_json::from_slice(&body_of(&response)).unwrap();
    let id = created["id"].as_str().unwrap();

    let get = format!("GET /api/Shoes/{id} HTTP/1.1\r\n\r\n");
    let response = raw_request(addr, get.as_bytes()).await;
    assert_eq!(status_of(&response), 200);
    assert_eq!(body_of(&response), b"{\"size\": 10}");
}
