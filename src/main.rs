//! Todo backend server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ routing::ResourceRouter ──▶ todos::TodoItemViewSet
//!                     (request id,      (prefix `todos`,            (validation, store)
//!                      trace, timeout)   list/detail, no `/`)
//!     ◀────────────── JSON response ◀─────────────────────────────────────┘
//!
//!     Cross-cutting: config (TOML), observability (tracing, metrics),
//!                    lifecycle (startup, signals, graceful shutdown)
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use todo_backend::config::{load_config, AppConfig};
use todo_backend::lifecycle::{self, signals, Shutdown};
use todo_backend::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "todo-backend")]
#[command(about = "REST API for todo items", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability)?;

    tracing::info!("todo-backend v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        trailing_slash = config.router.trailing_slash,
        request_timeout_secs = config.limits.request_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let service = lifecycle::bind(config).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());
    service.run(shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
