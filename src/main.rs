//! Subdomain reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────┐
//!                         │                 SUBDOMAIN PROXY                  │
//!                         │                                                  │
//!   Client Request        │  ┌─────────┐   ┌──────────┐   ┌──────────────┐   │
//!   ──────────────────────┼─▶│  http   │──▶│ routing  │──▶│   registry   │   │
//!   Host: api.example.com │  │ server  │   │ host→key │   │ key→target   │   │
//!                         │  └────┬────┘   └──────────┘   └──────┬───────┘   │
//!                         │       │ POST /set                    │           │
//!                         │       ▼                              ▼           │
//!                         │  ┌─────────┐                  ┌──────────────┐   │
//!                         │  │  admin  │── set ──────────▶│   dispatch   │───┼──▶ Backend
//!   Client Response       │  └─────────┘                  │  (per req.)  │   │
//!   ◀─────────────────────┼───────────────────────────────┴──────────────┘   │
//!                         └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use subdomain_proxy::config::load_config;
use subdomain_proxy::lifecycle::{signals, startup, Shutdown};
use subdomain_proxy::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "subdomain-proxy", version, about = "Host-based dynamic reverse proxy")]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    init_logging(&config.observability);

    tracing::info!("subdomain-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        mode = ?config.listener.mode,
        registry = ?config.registry.backend,
        registry_address = %config.registry.address,
        admin_path = %config.admin.path,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    startup::run(config, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
