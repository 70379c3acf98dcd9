//! Backend dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! BackendTarget string (from registry)
//!     → target.rs (parse absolute URL, reject non-http(s))
//!     → forwarder.rs (fresh client, rewrite URI, strip hop-by-hop headers)
//!     → upstream response streamed back unmodified
//! ```

pub mod forwarder;
pub mod headers;
pub mod target;

pub use forwarder::{dispatch, Dispatcher};
pub use target::BackendTarget;
