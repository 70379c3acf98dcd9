use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde::{Deserialize, Serialize};

use crate::error::ProxyError;
use crate::registry::{normalize_key, Registry};

/// Registration payload: `{"name": "...", "service_url": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterMapping {
    pub name: String,
    pub service_url: String,
}

/// Store a routing key → backend target mapping.
///
/// Only POST is accepted. The service URL is stored verbatim.
pub async fn register_mapping(
    registry: &dyn Registry,
    request: Request<Body>,
    max_body_bytes: usize,
) -> Result<StatusCode, ProxyError> {
    if request.method() != Method::POST {
        return Err(ProxyError::malformed(format!(
            "method {} not allowed",
            request.method()
        )));
    }

    let bytes = axum::body::to_bytes(request.into_body(), max_body_bytes)
        .await
        .map_err(|e| ProxyError::malformed(format!("unreadable body: {e}")))?;
    let mapping: RegisterMapping = serde_json::from_slice(&bytes)
        .map_err(|e| ProxyError::malformed(format!("invalid json: {e}")))?;

    let key = normalize_key(&mapping.name);
    if let Err(e) = registry.set(&key, &mapping.service_url).await {
        tracing::error!(
            key = %key,
            value = %mapping.service_url,
            error = %e,
            "Failed to set registry value"
        );
        return Err(ProxyError::RegistryWriteFailure(e));
    }

    metrics::counter!("registry_mappings_set_total").increment(1);
    tracing::info!(key = %key, service_url = %mapping.service_url, "Mapping registered");
    Ok(StatusCode::OK)
}
