//! Request reading.
//!
//! # Responsibilities
//! - Accumulate bytes from one connection until the header terminator
//!   (CRLF CRLF) has been seen
//! - Keep reading until the body announced by `Content-Length` is complete
//! - Tolerate early peer close and read errors: whatever arrived is still
//!   handed to the parser
//!
//! # Design Decisions
//! - The reader is byte-oriented; text decoding and all malformed-request
//!   decisions belong to the parser
//! - `Content-Length` is matched case-insensitively here because body
//!   completion is a wire concern, unlike the exact-case environment keys

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::net::connection::ConnectionId;

/// Bytes requested from the socket per read call.
pub const READ_CHUNK_SIZE: usize = 1024;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Read one request off the connection.
///
/// Returns the accumulated buffer: headers, terminator, and as much of the
/// declared body as the peer delivered. Read errors terminate accumulation
/// but do not fail the request.
pub async fn read_request<R>(conn: &mut R, connection_id: ConnectionId) -> Vec<u8>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = Vec::new();
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    let header_end = loop {
        match conn.read(&mut chunk).await {
            Ok(0) => return buffer,
            Ok(n) => {
                buffer.extend_from_slice(&chunk[..n]);
                if let Some(end) = find_terminator(&buffer) {
                    break end;
                }
            }
            Err(err) => {
                tracing::warn!(
                    connection_id = %connection_id,
                    error = %err,
                    "Read failed mid-request, keeping partial buffer"
                );
                return buffer;
            }
        }
    };

    // Headers are complete; drain the rest of the announced body. The sum
    // saturates, so a nonsense declaration reads until peer close instead
    // of wrapping.
    let body_start = header_end + HEADER_TERMINATOR.len();
    let declared = declared_content_length(&buffer[..header_end]);
    let total_needed = body_start.saturating_add(declared);

    while buffer.len() < total_needed {
        match conn.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => buffer.extend_from_slice(&chunk[..n]),
            Err(err) => {
                tracing::warn!(
                    connection_id = %connection_id,
                    error = %err,
                    "Read failed mid-body, keeping partial buffer"
                );
                break;
            }
        }
    }

    buffer
}

/// Find the start index of the first CRLF CRLF sequence.
fn find_terminator(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(HEADER_TERMINATOR.len())
        .position(|window| window == HEADER_TERMINATOR)
}

/// Extract the declared body length from a raw header block.
///
/// Absent or unparseable declarations count as zero, which makes the reader
/// stop at the terminator exactly as if no body was announced.
fn declared_content_length(header_block: &[u8]) -> usize {
    let text = String::from_utf8_lossy(header_block);
    for line in text.lines() {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                return value.trim().parse().unwrap_or(0);
            }
        }
    }
    0
}
