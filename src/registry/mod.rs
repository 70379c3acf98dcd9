//! Routing registry subsystem.
//!
//! # Data Flow
//! ```text
//! Admin endpoint (POST /set)
//!     → Registry::set(name, service_url)
//!     → backing store (Redis or in-memory)
//!
//! Proxied request
//!     → Registry::get(routing_key)
//!     → BackendTarget string (validated later by dispatch)
//! ```
//!
//! # Design Decisions
//! - Keys are lowercased inside every implementation, callers never normalize
//! - Values are stored verbatim; a bad URL is only detected at dispatch time
//! - No caching in front of the store: every lookup is a fresh round trip
//! - Implementations are shared as `Arc<dyn Registry>` and must be safe for
//!   concurrent use without external locking

pub mod memory;
pub mod redis;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{RegistryBackend, RegistryConfig};

pub use self::memory::MemoryRegistry;
pub use self::redis::RedisRegistry;

/// Errors returned by registry implementations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The key has no entry.
    #[error("no entry for key `{0}`")]
    NotFound(String),

    /// The backing store failed while serving a command.
    #[error("registry unavailable: {0}")]
    Unavailable(String),

    /// The backing store could not be reached at startup.
    #[error("failed to connect to registry at {address}: {reason}")]
    Connect { address: String, reason: String },
}

/// Key-value capability mapping routing keys to backend targets.
#[async_trait]
pub trait Registry: Send + Sync + std::fmt::Debug {
    /// Store `value` under the lowercased `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), RegistryError>;

    /// Fetch the value stored under the lowercased `key`.
    async fn get(&self, key: &str) -> Result<String, RegistryError>;
}

/// Normalize a key before it touches a backing store.
pub fn normalize_key(key: &str) -> String {
    key.to_lowercase()
}

/// Build the registry selected by configuration.
pub async fn connect(config: &RegistryConfig) -> Result<Arc<dyn Registry>, RegistryError> {
    match config.backend {
        RegistryBackend::Redis => {
            let registry = RedisRegistry::connect(config).await?;
            Ok(Arc::new(registry))
        }
        RegistryBackend::Memory => {
            tracing::warn!("Using in-memory registry, mappings are lost on restart");
            Ok(Arc::new(MemoryRegistry::new()))
        }
    }
}
