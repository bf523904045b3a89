//! Response type.
//!
//! Carries status, headers, and a chunked body; converts into the chunk
//! sequence the gateway writer consumes.

use std::fmt;

use crate::gateway::handler::BodyChunks;

/// A framework-level response.
///
/// Defaults: status 200, `content-type: text/html; charset=utf-8`.
pub struct Response {
    chunks: Vec<Vec<u8>>,
    status: u16,
    content_type: String,
    charset: String,
    extra_headers: Vec<(String, String)>,
}

impl Response {
    /// Text response; the body becomes a single UTF-8 chunk.
    pub fn new(body: impl Into<String>) -> Self {
        let body = body.into();
        let chunks = if body.is_empty() {
            Vec::new()
        } else {
            vec![body.into_bytes()]
        };
        Self {
            chunks,
            status: 200,
            content_type: "text/html".to_string(),
            charset: "utf-8".to_string(),
            extra_headers: Vec::new(),
        }
    }

    /// The fixed page returned when nothing else handled the request.
    pub fn not_found() -> Self {
        Self::new("<h1>Not Found</h1>").with_status(404)
    }

    /// Replace the status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Replace the content type (charset suffix is kept).
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Replace the charset reported in the content-type header.
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Append an extra header after content-type.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    /// Numeric status code.
    pub fn status_code(&self) -> u16 {
        self.status
    }

    /// Status text for the wire: code plus canonical reason phrase,
    /// `UNKNOWN` for unassigned codes.
    pub fn status_line(&self) -> String {
        let reason = http::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("UNKNOWN");
        format!("{} {}", self.status, reason)
    }

    /// Headers in write order: content-type first, then extras.
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![(
            "content-type".to_string(),
            format!("{}; charset={}", self.content_type, self.charset),
        )];
        headers.extend(self.extra_headers.iter().cloned());
        headers
    }

    /// Consume into the gateway's body-chunk sequence.
    pub fn into_chunks(self) -> BodyChunks {
        Box::new(self.chunks.into_iter())
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Response: status: {}>", self.status_line())
    }
}
