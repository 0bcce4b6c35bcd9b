//! Tests for serving the app on a real listener.

mod common;

use std::io::{Read, Write};

use common::*;
use tokengate::run_server;

/// Send a raw HTTP/1.1 request and read the whole response.
fn send(addr: std::net::SocketAddr, request: &str) -> String {
    let mut stream = std::net::TcpStream::connect(addr).unwrap();
    stream.write_all(request.as_bytes()).unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

#[tokio::test]
async fn test_run_server_serves_app_on_listener() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(run_server(test_config(), listener));

    let response = tokio::task::spawn_blocking(move || {
        send(
            addr,
            "GET /config HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
    })
    .await
    .unwrap();

    assert!(
        response.starts_with("HTTP/1.1 200"),
        "Unexpected response: {}",
        response
    );
    assert!(response.contains("\"authenticated\":false"));

    let response = tokio::task::spawn_blocking(move || {
        send(
            addr,
            "GET /user/v1/profile HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
    })
    .await
    .unwrap();

    assert!(
        response.starts_with("HTTP/1.1 401"),
        "Unexpected response: {}",
        response
    );

    server.abort();
}
