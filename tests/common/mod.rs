//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use wicket::config::ServerConfig;
use wicket::gateway::{Handler, Server};
use wicket::net::Listener;

/// Start a server on an ephemeral port and return the bound address.
pub async fn start_server(handler: Arc<dyn Handler>) -> SocketAddr {
    let mut config = ServerConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;

    let listener = Listener::bind(&config.listener).await.unwrap();
    let addr = listener.local_addr();

    let server = Server::new(config, handler);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    addr
}

/// Send raw request bytes and collect the response until the server closes.
pub async fn send_request(addr: SocketAddr, raw: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    response
}
