//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware, single entry point)
//!     → request.rs (request ID, tracing span)
//!     → admin path?  → admin::register_mapping
//!       otherwise    → routing → registry → dispatch
//!     → response.rs (errors become bare status codes)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
