//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Accumulated request buffer (net::reader)
//!     → parser.rs (request line + header lines → Headers, body text)
//!     → headers.rs (standardize: guarantee the standard name set)
//!     → Hand off to the gateway layer
//! ```

pub mod headers;
pub mod parser;

pub use headers::{standardize, Headers, STANDARD_NAMES};
pub use parser::{parse_request, ParseError};
