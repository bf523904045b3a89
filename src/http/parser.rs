//! Raw request parsing.
//!
//! # Responsibilities
//! - Turn one accumulated request buffer into a header mapping and body text
//! - Reject buffers a well-formed HTTP/1.1 request could not have produced
//!
//! # Design Decisions
//! - Pure function of its input; parsing the same buffer twice yields the
//!   same output
//! - The request line becomes three synthetic entries inserted before the
//!   request's own header lines, so iteration shows method/path/version first
//! - An empty buffer is the degenerate no-op case, not an error

use thiserror::Error;

use crate::http::headers::{Headers, PATH_INFO, REQUEST_METHOD, SERVER_PROTOCOL};

/// Errors for buffers that cannot be parsed as a request.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The buffer is not valid UTF-8 text.
    #[error("request is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The request line did not contain exactly method, path, and version.
    #[error("malformed request line: {0:?}")]
    RequestLine(String),

    /// A header line had no colon separator.
    #[error("malformed header line: {0:?}")]
    HeaderLine(String),
}

/// Parse an accumulated request buffer into (headers, body).
///
/// The buffer is trimmed, then split on the first blank-line terminator;
/// without a terminator the whole buffer is treated as the header section
/// and the body is empty.
pub fn parse_request(raw: &[u8]) -> Result<(Headers, String), ParseError> {
    if raw.is_empty() {
        return Ok((Headers::new(), String::new()));
    }

    let text = std::str::from_utf8(raw)?.trim();

    let (header_section, body) = match text.split_once("\r\n\r\n") {
        Some((head, tail)) => (head, tail),
        None => (text, ""),
    };

    let mut lines = header_section.lines();
    let request_line = lines.next().unwrap_or("");

    let mut tokens = request_line.split_whitespace();
    let (method, path, version) = match (tokens.next(), tokens.next(), tokens.next(), tokens.next())
    {
        (Some(method), Some(path), Some(version), None) => (method, path, version),
        _ => return Err(ParseError::RequestLine(request_line.to_string())),
    };

    let mut headers = Headers::new();
    headers.insert(REQUEST_METHOD, method);
    headers.insert(PATH_INFO, path);
    headers.insert(SERVER_PROTOCOL, version);

    for line in lines {
        if line.is_empty() {
            continue;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| ParseError::HeaderLine(line.to_string()))?;
        headers.insert(name.trim(), value.trim());
    }

    Ok((headers, body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_get_without_body() {
        let raw = b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: keep-alive\r\n\r\n";
        let (headers, body) = parse_request(raw).unwrap();

        let entries: Vec<(&str, &str)> = headers.iter().collect();
        assert_eq!(
            entries,
            [
                ("REQUEST_METHOD", "GET"),
                ("PATH_INFO", "/"),
                ("SERVER_PROTOCOL", "HTTP/1.1"),
                ("Host", "localhost"),
                ("Connection", "keep-alive"),
            ]
        );
        assert_eq!(body, "");
    }

    #[test]
    fn post_with_body() {
        let raw = b"POST /submit HTTP/1.1\r\nHost: localhost\r\nConnection: keep-alive\r\nContent-Length: 10\r\n\r\nHello World";
        let (headers, body) = parse_request(raw).unwrap();

        assert_eq!(headers.get("REQUEST_METHOD"), Some("POST"));
        assert_eq!(headers.get("PATH_INFO"), Some("/submit"));
        assert_eq!(headers.get("Content-Length"), Some("10"));
        assert_eq!(body, "Hello World");
    }

    #[test]
    fn names_and_values_are_trimmed() {
        let raw = b"GET / HTTP/1.1\r\nHost :   localhost  \r\n\r\n";
        let (headers, _) = parse_request(raw).unwrap();
        assert_eq!(headers.get("Host"), Some("localhost"));
    }

    #[test]
    fn empty_buffer_is_not_an_error() {
        let (headers, body) = parse_request(b"").unwrap();
        assert!(headers.is_empty());
        assert_eq!(body, "");
    }

    #[test]
    fn whitespace_only_buffer_fails_the_request_line() {
        let err = parse_request(b"  \r\n ").unwrap_err();
        assert!(matches!(err, ParseError::RequestLine(_)));
    }

    #[test]
    fn parsing_is_idempotent() {
        let raw = b"GET /a/b?x=1 HTTP/1.1\r\nHost: localhost\r\nAccept: */*\r\n\r\n";
        let first = parse_request(raw).unwrap();
        let second = parse_request(raw).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn round_trip_reproduces_parts() {
        let raw = format!(
            "{} {} {}\r\n{}: {}\r\n{}: {}\r\n\r\n{}",
            "PUT", "/items/7", "HTTP/1.1", "Host", "localhost", "Content-Type", "text/plain", "payload"
        );
        let (headers, body) = parse_request(raw.as_bytes()).unwrap();

        assert_eq!(headers.get("REQUEST_METHOD"), Some("PUT"));
        assert_eq!(headers.get("PATH_INFO"), Some("/items/7"));
        assert_eq!(headers.get("SERVER_PROTOCOL"), Some("HTTP/1.1"));
        assert_eq!(headers.get("Host"), Some("localhost"));
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
        assert_eq!(body, "payload");
    }

    #[test]
    fn short_request_line_is_rejected() {
        let err = parse_request(b"GET /\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::RequestLine(_)));
    }

    #[test]
    fn long_request_line_is_rejected() {
        let err = parse_request(b"GET / HTTP/1.1 extra\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::RequestLine(_)));
    }

    #[test]
    fn colonless_header_line_is_rejected() {
        let err = parse_request(b"GET / HTTP/1.1\r\nno colon here\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::HeaderLine(_)));
    }

    #[test]
    fn non_utf8_buffer_is_rejected() {
        let err = parse_request(&[0x47, 0x45, 0x54, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, ParseError::Encoding(_)));
    }

    #[test]
    fn value_may_contain_colons() {
        let raw = b"GET / HTTP/1.1\r\nHost: localhost:8000\r\n\r\n";
        let (headers, _) = parse_request(raw).unwrap();
        assert_eq!(headers.get("Host"), Some("localhost:8000"));
    }

    #[test]
    fn missing_terminator_means_empty_body() {
        let raw = b"GET / HTTP/1.1\r\nHost: localhost";
        let (headers, body) = parse_request(raw).unwrap();
        assert_eq!(headers.get("Host"), Some("localhost"));
        assert_eq!(body, "");
    }
}
