//! Startup orchestration.
//!
//! # Responsibilities
//! - Connect the registry (fail fast if it is unreachable)
//! - Start the metrics exporter when enabled
//! - Bind the listener in the configured mode and serve until shutdown
//!
//! # Design Decisions
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last (traffic only when the registry is ready)

use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ProxyConfig, ServeMode};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::net::tls::{load_tls_config, TlsError};
use crate::observability::metrics;
use crate::registry::{self, RegistryError};

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Tls(#[from] TlsError),
    #[error("invalid bind address `{0}`")]
    BindAddress(String),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bring the proxy up and serve until `shutdown` fires.
pub async fn run(config: ProxyConfig, shutdown: Shutdown) -> Result<(), StartupError> {
    let registry = registry::connect(&config.registry).await?;
    tracing::info!(backend = ?config.registry.backend, "Registry ready");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let addr: SocketAddr = config
        .listener
        .bind_address
        .parse()
        .map_err(|_| StartupError::BindAddress(config.listener.bind_address.clone()))?;

    match (config.listener.mode, config.listener.tls.clone()) {
        (ServeMode::Tls, Some(tls)) => {
            let rustls = load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path)).await?;
            let server = HttpServer::new(config, registry);
            server.run_tls(addr, rustls, shutdown.subscribe()).await?;
        }
        (ServeMode::Tls, None) => return Err(TlsError::MissingConfig.into()),
        (ServeMode::Plain, _) => {
            let listener = TcpListener::bind(addr).await?;
            let server = HttpServer::new(config, registry);
            server.run(listener, shutdown.subscribe()).await?;
        }
    }

    Ok(())
}
