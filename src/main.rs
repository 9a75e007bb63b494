//! Caching Reverse Proxy
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request        ┌──────────────────────────────────────────────┐
//!     ─────────────────────▶│ http::server ──▶ http::rewrite               │
//!                           │                      │                       │
//!                           │                      ▼                       │
//!                           │               http::forward ◀──▶ cache       │
//!                           │                      │                       │
//!     Client Response       │                      ▼                       │
//!     ◀─────────────────────│ http::response ◀── upstream::client ◀────────┼──── Upstream
//!                           │                                              │
//!                           │  config · observability · lifecycle          │
//!                           └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use caching_proxy::config::{load_config, validate_config, ConfigError, ProxyConfig};
use caching_proxy::lifecycle::{signals, Shutdown};
use caching_proxy::observability::{logging, metrics};
use caching_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "caching-proxy")]
#[command(about = "Reverse proxy with a short-lived response cache", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Upstream base URL, overriding the config file.
    #[arg(short, long)]
    upstream: Option<String>,

    /// Listener bind address, overriding the config file.
    #[arg(short, long)]
    bind: Option<String>,
}

fn resolve_config(cli: &Cli) -> Result<ProxyConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    if let Some(upstream) = &cli.upstream {
        config.upstream.url = upstream.clone();
    }
    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
    }

    // Overrides bypass the loader, so validate again.
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    logging::init_logging(&config.observability);

    tracing::info!("caching-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.url,
        cache_enabled = config.cache.enabled,
        ttl_secs = config.cache.ttl_secs,
        "Configuration loaded"
    );

    // Fail before binding if the upstream is unusable.
    let server = HttpServer::new(config.clone())?;

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(&shutdown);

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
