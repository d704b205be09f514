//! statusd: composite health-check service.
//!
//! # Architecture Overview
//!
//! ```text
//!     GET /status
//!     ─────────────▶ http::server ──▶ cache (TTL + single flight)
//!                                         │ miss
//!                                         ▼
//!                                  probe::coordinator
//!                                    │     │     │   (concurrent)
//!                                    ▼     ▼     ▼
//!                                  probe::executor ──▶ transport ──▶ hosts
//!                                         │
//!                                         ▼
//!                                  probe::strategy (+ canonical JSON)
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use statusd::config::load_config;
use statusd::lifecycle::startup::build_cache;
use statusd::observability::{logging, metrics};
use statusd::{Shutdown, StatusServer};

#[derive(Parser)]
#[command(name = "statusd")]
#[command(about = "Composite health-check service", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "statusd.toml")]
    config: PathBuf,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = logging::init_logging(logging::BOOTSTRAP_LEVEL);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "statusd starting");

    let mut config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(config = %cli.config.display(), error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    log_level.set(&config.observability.log_level);

    tracing::info!(
        config = %cli.config.display(),
        bind_address = %config.listener.bind_address,
        hosts = config.hosts.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let base_dir = cli
        .config
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let cache = build_cache(&config, &base_dir)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = StatusServer::new(cache, &config.listener);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
