//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop)
//!     → connection.rs (id assignment, in-flight tracking)
//!     → reader.rs (accumulate request bytes)
//!     → Hand off to the gateway layer
//! ```
//!
//! # Design Decisions
//! - Each connection is owned by exactly one worker from accept to close
//! - Workers are tracked so shutdown can drain them instead of aborting
//! - No TLS, no connection reuse: one request-response cycle per connection

pub mod connection;
pub mod listener;
pub mod reader;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionTracker};
pub use listener::{Listener, ListenerError};
pub use reader::read_request;
