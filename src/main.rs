//! hello-router
//!
//! Serves the tutorial site: `/` says hello, `/goodbye` says goodbye, and
//! everything else gets the configured "not found" page.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request     ┌──────────┐    ┌──────────────┐    ┌──────────────┐
//!     ──────────────────▶│   net    │───▶│ http server  │───▶│   routing    │
//!                        │ listener │    │ (axum/hyper) │    │  dispatch    │
//!                        └──────────┘    └──────┬───────┘    └──────┬───────┘
//!                                               │                   │
//!     Client Response                           ▼                   ▼
//!     ◀─────────────────────────────────── response ◀──── handler or fallback
//! ```

use std::path::PathBuf;

use clap::Parser;

use hello_router::app::tutorial_router;
use hello_router::config::{load_config, validate_config, ConfigError, ServerConfig};
use hello_router::http::HttpServer;
use hello_router::lifecycle::{signals, Shutdown};
use hello_router::net;
use hello_router::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "hello-router")]
#[command(about = "Serve the hello/goodbye tutorial site", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the port of `listener.bind_address`.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override `observability.log_level`.
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
    apply_overrides(&mut config, &cli)?;

    logging::init_logging(&config.observability)?;

    tracing::info!("hello-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_connections = config.listener.max_connections,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let router = tutorial_router(&config.fallback)?;
    for route in router.routes() {
        tracing::info!(method = %route.method(), path = route.path(), "Route registered");
    }

    let listener = net::bind(&config.listener).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            signals::wait_for_signal().await;
            shutdown.trigger();
        }
    });

    let server = HttpServer::new(config, router);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Apply command line overrides, then re-validate.
fn apply_overrides(config: &mut ServerConfig, cli: &Cli) -> Result<(), ConfigError> {
    if let Some(port) = cli.port {
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "127.0.0.1".to_string());
        config.listener.bind_address = format!("{host}:{port}");
    }

    if let Some(level) = &cli.log_level {
        config.observability.log_level = level.clone();
    }

    validate_config(config).map_err(ConfigError::Validation)
}
