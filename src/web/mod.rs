//! Web framework subsystem.
//!
//! # Data Flow
//! ```text
//! Environ (gateway)
//!     → request.rs (read-only view: method, path, args)
//!     → router.rs (regex table, first match wins)
//!     → route callback → response.rs / template.rs
//!     → app.rs (Handler impl: catch-all 404, start-response, chunks)
//! ```
//!
//! # Design Decisions
//! - This layer sits entirely on the gateway's handler contract; it never
//!   touches sockets or raw buffers
//! - Template rendering happens inside the callback, before the response
//!   descriptor is recorded, so failures still collapse cleanly

pub mod app;
pub mod request;
pub mod response;
pub mod router;
pub mod template;

pub use app::App;
pub use request::Request;
pub use response::Response;
pub use router::{RouteCallback, RouteError, Router};
pub use template::{TemplateError, TemplateResponse};
