//! Host-based dynamic reverse proxy library.
//!
//! Requests are routed by subdomain: `billing.example.com` resolves the key
//! `billing` in the registry and is forwarded to the stored backend URL.
//! Mappings are registered at runtime through the admin endpoint.

pub mod admin;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod registry;
pub mod routing;

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use registry::{MemoryRegistry, RedisRegistry, Registry};
