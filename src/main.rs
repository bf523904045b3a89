//! wicket: a small gateway-interface HTTP server.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                   WICKET                     │
//!                         │                                              │
//!   Client Request        │  ┌─────────┐   ┌─────────┐   ┌───────────┐  │
//!   ──────────────────────┼─▶│   net   │──▶│  http   │──▶│  gateway  │  │
//!                         │  │listener │   │ parser  │   │  environ  │  │
//!                         │  │ +reader │   └─────────┘   └─────┬─────┘  │
//!                         │  └─────────┘                       │        │
//!                         │                                    ▼        │
//!                         │                              ┌───────────┐  │
//!                         │                              │  handler  │  │
//!                         │                              │ web::App  │  │
//!                         │                              │ + Router  │  │
//!                         │                              └─────┬─────┘  │
//!   Client Response       │  ┌──────────────────┐              │        │
//!   ◀─────────────────────┼──│ gateway response │◀─────────────┘        │
//!                         │  │ writer (+ 404    │                       │
//!                         │  │ fallback policy) │                       │
//!                         │  └──────────────────┘                       │
//!                         │                                              │
//!                         │  cross-cutting: config / observability       │
//!                         └──────────────────────────────────────────────┘
//! ```
//!
//! One worker task per connection; one request-response cycle per
//! connection; Ctrl+C stops accepting and drains in-flight workers.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use wicket::config::loader::{load_config, ConfigError};
use wicket::config::validation::validate_config;
use wicket::config::ServerConfig;
use wicket::gateway::Server;
use wicket::net::Listener;
use wicket::observability::logging;
use wicket::web::{App, Response};

#[derive(Parser)]
#[command(name = "wicket")]
#[command(about = "A small gateway-interface HTTP server", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the configured bind port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the configured log level.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(host) = cli.host {
        config.listener.host = host;
    }
    if let Some(port) = cli.port {
        config.listener.port = port;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init(&config.logging);

    tracing::info!("wicket v0.1.0 starting");
    tracing::info!(
        host = %config.listener.host,
        port = config.listener.port,
        log_level = %config.logging.level,
        "Configuration loaded"
    );

    let app = demo_app()?;

    let listener = Listener::bind(&config.listener).await?;
    let server = Server::new(config, Arc::new(app));
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// The routes served until this binary grows a real application.
fn demo_app() -> Result<App, wicket::web::RouteError> {
    let mut app = App::new();

    app.route(r"^/$", |_request, _args| {
        Ok(Response::new("<h1>Welcome to wicket!</h1>"))
    })?;

    app.route(r"^/hello/(\w+)/?$", |request, args| {
        let greeting = request
            .args()
            .get("greeting")
            .cloned()
            .unwrap_or_else(|| "Hello".to_string());
        Ok(Response::new(format!("<h1>{}, {}!</h1>", greeting, args[0])))
    })?;

    Ok(app)
}
