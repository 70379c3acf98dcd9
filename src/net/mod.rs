//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → plaintext: axum::serve
//!     → tls mode:  tls.rs (certificate from disk) → axum-server rustls acceptor
//!     → Hand off to HTTP layer
//! ```
//!
//! TLS is optional; most deployments terminate it in front of the proxy.

pub mod tls;
