//! Gateway subsystem: the handler-facing request/response contract.
//!
//! # Data Flow
//! ```text
//! Parsed headers + body (http layer)
//!     → environ.rs (fixed-key environment, body stream)
//!     → handler.rs (invoke the application, collapse failures)
//!     → response.rs (status line, headers, forced keep-alive, chunks)
//!     → server.rs ties the cycle to one connection per worker
//! ```
//!
//! # Design Decisions
//! - The environment is rebuilt per request; handlers only ever borrow it
//! - One explicit policy function produces the 404 fallback for every
//!   failure class: parse errors, handler errors, missing descriptor

pub mod environ;
pub mod handler;
pub mod response;
pub mod server;

pub use environ::{build_environ, Environ, ErrorStream};
pub use handler::{invoke, BodyChunks, Handler, HandlerError};
pub use response::{
    not_found_response, write_response, ResponseDescriptor, StartResponse, FALLBACK_BODY,
    FALLBACK_STATUS, PROTOCOL_VERSION,
};
pub use server::Server;
