//! Request-level error taxonomy.
//!
//! Every variant is terminal for the request that produced it and is
//! reported to the caller as a bare status code (see `http::response`).

use axum::http::StatusCode;
use thiserror::Error;

use crate::registry::RegistryError;

/// Errors raised while routing or administering a single request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Host header matched neither `sub.domain.tld` nor `www.sub.domain.tld`.
    #[error("unrecognized host format: {host:?}")]
    UnrecognizedHostFormat { host: String },

    /// No registry entry for the routing key, or the registry could not be reached.
    #[error("no backend registered for `{key}`")]
    NotFound { key: String },

    /// The stored backend target is not an absolute http(s) URL.
    #[error("invalid target url {target:?}: {reason}")]
    InvalidTargetUrl { target: String, reason: String },

    /// Admin request used the wrong method or carried an undecodable body.
    #[error("malformed admin request: {0}")]
    MalformedAdminRequest(String),

    /// Writing a mapping into the registry failed.
    #[error("registry write failed: {0}")]
    RegistryWriteFailure(#[source] RegistryError),

    /// The upstream could not be reached or aborted the exchange.
    #[error("upstream request to {target} failed: {reason}")]
    Upstream { target: String, reason: String },
}

impl ProxyError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedAdminRequest(reason.into())
    }

    /// Status code reported to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::UnrecognizedHostFormat { .. }
            | ProxyError::NotFound { .. }
            | ProxyError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::InvalidTargetUrl { .. } | ProxyError::RegistryWriteFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProxyError::MalformedAdminRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::UnrecognizedHostFormat { .. } => "unrecognized_host",
            ProxyError::NotFound { .. } => "not_found",
            ProxyError::InvalidTargetUrl { .. } => "invalid_target",
            ProxyError::MalformedAdminRequest(_) => "malformed_admin_request",
            ProxyError::RegistryWriteFailure(_) => "registry_write_failure",
            ProxyError::Upstream { .. } => "upstream",
        }
    }
}
