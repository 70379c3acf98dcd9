//! Admin endpoint: the only write path into the routing registry.
//!
//! There is no authentication in front of this endpoint. Deployments that
//! expose the proxy publicly must restrict the admin path upstream.

pub mod handlers;

pub use handlers::{register_mapping, RegisterMapping};
