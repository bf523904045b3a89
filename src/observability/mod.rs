//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!
//! Consumers:
//!     → Log aggregation (stdout, RUST_LOG-filtered)
//! ```
//!
//! # Design Decisions
//! - Structured events over free-form strings; connection ids flow through
//!   every per-request event for correlation
//! - No metrics surface; tracing is the single observability channel

pub mod logging;
