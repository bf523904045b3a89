//! Server run loop.
//!
//! # Responsibilities
//! - Accept connections and hand each to its own worker task
//! - Drive one request-response cycle per connection
//! - Stop accepting on Ctrl+C and drain in-flight workers
//!
//! # Design Decisions
//! - The listener is bound by the caller and passed in, so tests and the
//!   binary control the port the same way
//! - Workers never propagate errors upward; every failure is terminal for
//!   its own connection and logged with the connection id

use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::config::ServerConfig;
use crate::gateway::environ::build_environ;
use crate::gateway::handler::{invoke, Handler};
use crate::gateway::response::{not_found_response, write_response};
use crate::http::parse_request;
use crate::net::{read_request, ConnectionGuard, ConnectionTracker, Listener, ListenerError};

/// The gateway server: one handler, one listener, one worker per connection.
pub struct Server {
    config: ServerConfig,
    handler: Arc<dyn Handler>,
}

impl Server {
    /// Create a server for the given configuration and handler.
    pub fn new(config: ServerConfig, handler: Arc<dyn Handler>) -> Self {
        Self { config, handler }
    }

    /// Run on an already-bound listener until interrupted.
    pub async fn run(self, listener: Listener) -> Result<(), ListenerError> {
        let addr = listener.local_addr();
        let host = self.config.listener.host.clone();
        let port = addr.port();
        let tracker = ConnectionTracker::new();

        tracing::info!(address = %addr, "Gateway server starting");

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = listener.accept() => {
                    let (stream, _peer) = match accepted {
                        Ok(pair) => pair,
                        Err(error) => {
                            tracing::warn!(error = %error, "Accept failed");
                            continue;
                        }
                    };

                    let guard = tracker.track();
                    let handler = Arc::clone(&self.handler);
                    let host = host.clone();
                    tokio::spawn(async move {
                        handle_connection(stream, handler, host, port, guard).await;
                    });
                }
            }
        }

        // Release the endpoint before waiting out in-flight workers.
        drop(listener);
        tracker.drain().await;

        tracing::info!("Gateway server stopped");
        Ok(())
    }
}

/// One request-response cycle on one connection.
async fn handle_connection(
    mut stream: TcpStream,
    handler: Arc<dyn Handler>,
    host: String,
    port: u16,
    guard: ConnectionGuard,
) {
    let raw = read_request(&mut stream, guard.id()).await;

    let (descriptor, body) = match parse_request(&raw) {
        Ok((headers, body_text)) => {
            let environ = build_environ(&headers, &host, port, body_text);
            invoke(handler.as_ref(), &environ)
        }
        Err(error) => {
            tracing::warn!(
                connection_id = %guard.id(),
                error = %error,
                "Malformed request, substituting fallback response"
            );
            not_found_response()
        }
    };

    tracing::debug!(
        connection_id = %guard.id(),
        status = %descriptor.status,
        "Request handled"
    );

    if let Err(error) = write_response(&mut stream, &descriptor, body).await {
        tracing::warn!(
            connection_id = %guard.id(),
            error = %error,
            "Client closed the connection early"
        );
    }

    if let Err(error) = stream.shutdown().await {
        tracing::trace!(connection_id = %guard.id(), error = %error, "Socket close failed");
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
