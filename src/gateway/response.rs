//! Response serialization.
//!
//! # Responsibilities
//! - Record the status and headers a handler supplies via start-response
//! - Write the status line, headers, and body chunks onto the connection
//! - Provide the fixed fallback response used for every request-level failure
//!
//! # Design Decisions
//! - The status line always carries `HTTP/1.1`, whatever version the client
//!   sent
//! - `Connection: keep-alive` is appended after the handler's headers even
//!   though the connection closes right after; the header is part of the
//!   observable wire format
//! - Calling start-response again replaces the previous descriptor

use std::iter;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::gateway::handler::BodyChunks;

/// Protocol version used on every status line.
pub const PROTOCOL_VERSION: &str = "HTTP/1.1";

/// Status of the fallback response.
pub const FALLBACK_STATUS: &str = "404 Not Found";

/// Body of the fallback response.
pub const FALLBACK_BODY: &str = "<h1>Not Found</h1>";

/// Status and headers for one response, recorded via [`StartResponse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDescriptor {
    /// Status text as written on the wire (e.g., "200 OK").
    pub status: String,
    /// Response headers in write order.
    pub headers: Vec<(String, String)>,
}

/// The start-response callback state for one handler invocation.
///
/// Handlers call [`StartResponse::start`] before returning body chunks.
/// The last call wins; never calling it makes the invocation a failure.
#[derive(Debug, Default)]
pub struct StartResponse {
    descriptor: Option<ResponseDescriptor>,
}

impl StartResponse {
    /// Fresh, un-started state for one invocation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the response status and headers.
    pub fn start(&mut self, status: impl Into<String>, headers: Vec<(String, String)>) {
        self.descriptor = Some(ResponseDescriptor {
            status: status.into(),
            headers,
        });
    }

    /// Whether a descriptor has been recorded.
    pub fn is_started(&self) -> bool {
        self.descriptor.is_some()
    }

    /// Consume into the recorded descriptor, if any.
    pub fn into_descriptor(self) -> Option<ResponseDescriptor> {
        self.descriptor
    }
}

/// The fixed response substituted for any request-level failure.
pub fn not_found_response() -> (ResponseDescriptor, BodyChunks) {
    let descriptor = ResponseDescriptor {
        status: FALLBACK_STATUS.to_string(),
        headers: vec![(
            "Content-Type".to_string(),
            "text/html; charset=utf-8".to_string(),
        )],
    };
    let body: BodyChunks = Box::new(iter::once(FALLBACK_BODY.as_bytes().to_vec()));
    (descriptor, body)
}

/// Serialize one response onto the connection.
///
/// Emits the status line, the recorded headers, the forced keep-alive
/// header, a blank line, then every body chunk in order. The caller closes
/// the connection afterwards.
pub async fn write_response<W>(
    conn: &mut W,
    descriptor: &ResponseDescriptor,
    body: BodyChunks,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut head = format!("{} {}\r\n", PROTOCOL_VERSION, descriptor.status);
    for (name, value) in &descriptor.headers {
        head.push_str(name);
        head.push_str(": ");
        head.push_str(value);
        head.push_str("\r\n");
    }
    head.push_str("Connection: keep-alive\r\n\r\n");

    conn.write_all(head.as_bytes()).await?;
    for chunk in body {
        conn.write_all(&chunk).await?;
    }
    conn.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(parts: &[&str]) -> BodyChunks {
        let owned: Vec<Vec<u8>> = parts.iter().map(|part| part.as_bytes().to_vec()).collect();
        Box::new(owned.into_iter())
    }

    #[tokio::test]
    async fn writes_status_headers_and_body() {
        let descriptor = ResponseDescriptor {
            status: "200 OK".to_string(),
            headers: vec![("content-type".to_string(), "text/html".to_string())],
        };

        let mut wire = Vec::new();
        write_response(&mut wire, &descriptor, chunks(&["hi"]))
            .await
            .unwrap();

        assert_eq!(
            wire,
            b"HTTP/1.1 200 OK\r\ncontent-type: text/html\r\nConnection: keep-alive\r\n\r\nhi"
        );
    }

    #[tokio::test]
    async fn body_chunks_are_written_in_order() {
        let descriptor = ResponseDescriptor {
            status: "200 OK".to_string(),
            headers: Vec::new(),
        };

        let mut wire = Vec::new();
        write_response(&mut wire, &descriptor, chunks(&["one", "two", "three"]))
            .await
            .unwrap();

        let text = String::from_utf8(wire).unwrap();
        assert!(text.ends_with("\r\n\r\nonetwothree"));
    }

    #[tokio::test]
    async fn keep_alive_is_forced_even_when_handler_set_connection() {
        let descriptor = ResponseDescriptor {
            status: "200 OK".to_string(),
            headers: vec![("Connection".to_string(), "close".to_string())],
        };

        let mut wire = Vec::new();
        write_response(&mut wire, &descriptor, chunks(&[]))
            .await
            .unwrap();

        let text = String::from_utf8(wire).unwrap();
        assert!(text.contains("Connection: close\r\nConnection: keep-alive\r\n\r\n"));
    }

    #[tokio::test]
    async fn fallback_response_shape() {
        let (descriptor, body) = not_found_response();
        assert_eq!(descriptor.status, "404 Not Found");

        let mut wire = Vec::new();
        write_response(&mut wire, &descriptor, body).await.unwrap();

        let text = String::from_utf8(wire).unwrap();
        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(text.contains("Content-Type: text/html; charset=utf-8\r\n"));
        assert!(text.ends_with("<h1>Not Found</h1>"));
    }

    #[test]
    fn start_response_last_call_wins() {
        let mut start_response = StartResponse::new();
        assert!(!start_response.is_started());

        start_response.start("200 OK", vec![]);
        start_response.start(
            "500 Internal Server Error",
            vec![("X-Attempt".to_string(), "2".to_string())],
        );

        let descriptor = start_response.into_descriptor().unwrap();
        assert_eq!(descriptor.status, "500 Internal Server Error");
        assert_eq!(descriptor.headers.len(), 1);
    }

    #[test]
    fn unstarted_state_has_no_descriptor() {
        assert!(StartResponse::new().into_descriptor().is_none());
    }
}
