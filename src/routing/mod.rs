//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (Host header or URI authority)
//!     → host.rs (strip port, match subdomain shape)
//!     → key.rs (lowercase RoutingKey)
//!     → Registry lookup (per request, never cached)
//! ```
//!
//! # Design Decisions
//! - Narrow pattern match instead of public-suffix parsing
//! - Deterministic: same host always yields the same key

pub mod host;
pub mod key;

pub use host::{extract_routing_key, request_host};
pub use key::RoutingKey;
