//! Redis-backed registry.
//!
//! # Responsibilities
//! - Build a bb8 connection pool from `[registry]` settings
//! - Verify the server answers PING before the proxy starts serving
//! - Translate SET/GET into registry semantics (missing key → NotFound)

use std::time::Duration;

use ::redis::AsyncCommands;
use async_trait::async_trait;
use bb8_redis::{bb8, RedisConnectionManager};
use url::Url;

use crate::config::RegistryConfig;
use crate::registry::{normalize_key, Registry, RegistryError};

type ConnectionPool = bb8::Pool<RedisConnectionManager>;

/// Registry stored in a Redis database.
#[derive(Debug, Clone)]
pub struct RedisRegistry {
    pool: ConnectionPool,
}

impl RedisRegistry {
    /// Connect to Redis and check the connection with a PING.
    pub async fn connect(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let url = connection_url(config)?;
        let connect_error = |reason: String| RegistryError::Connect {
            address: config.address.clone(),
            reason,
        };

        tracing::info!(
            address = %config.address,
            database = config.database,
            pool_size = config.pool_size,
            "Connecting to redis"
        );

        let manager =
            RedisConnectionManager::new(url.as_str()).map_err(|e| connect_error(e.to_string()))?;
        let pool = bb8::Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build(manager)
            .await
            .map_err(|e| connect_error(e.to_string()))?;

        {
            let mut conn = pool.get().await.map_err(|e| connect_error(e.to_string()))?;
            let pong: String = ::redis::cmd("PING")
                .query_async(&mut *conn)
                .await
                .map_err(|e| connect_error(e.to_string()))?;
            tracing::debug!(reply = %pong, "Redis answered ping");
        }

        Ok(Self { pool })
    }
}

#[async_trait]
impl Registry for RedisRegistry {
    async fn set(&self, key: &str, value: &str) -> Result<(), RegistryError> {
        let key = normalize_key(key);
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;
        conn.set::<_, _, ()>(key.as_str(), value)
            .await
            .map_err(|e| RegistryError::Unavailable(e.to_string()))
    }

    async fn get(&self, key: &str) -> Result<String, RegistryError> {
        let key = normalize_key(key);
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;
        let value: Option<String> = conn
            .get(key.as_str())
            .await
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;
        value.ok_or(RegistryError::NotFound(key))
    }
}

/// Build a `redis://` URL from the configured address, password and database.
///
/// `address` is either `host:port` or a complete `redis://` / `rediss://` URL.
fn connection_url(config: &RegistryConfig) -> Result<Url, RegistryError> {
    let invalid = |reason: String| RegistryError::Connect {
        address: config.address.clone(),
        reason,
    };

    let mut url = if config.address.starts_with("redis://") || config.address.starts_with("rediss://") {
        Url::parse(&config.address).map_err(|e| invalid(e.to_string()))?
    } else {
        Url::parse(&format!("redis://{}", config.address)).map_err(|e| invalid(e.to_string()))?
    };

    if url.path().is_empty() || url.path() == "/" {
        url.set_path(&format!("/{}", config.database));
    }

    if let Some(password) = config.password.as_deref().filter(|p| !p.is_empty()) {
        url.set_password(Some(password))
            .map_err(|_| invalid("address cannot carry credentials".to_string()))?;
    }

    Ok(url)
}
