//! Wicket: a small gateway-interface HTTP server with a routed web layer.

pub mod config;
pub mod gateway;
pub mod http;
pub mod net;
pub mod observability;
pub mod web;

pub use config::ServerConfig;
pub use gateway::{Handler, Server, StartResponse};
pub use web::App;
