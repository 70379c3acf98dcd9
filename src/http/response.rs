//! Error → response mapping.
//!
//! Failures are reported as a bare status code with an empty body.
//! Diagnostic detail goes to the log only.

use axum::response::{IntoResponse, Response};

use crate::error::ProxyError;

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ProxyError::InvalidTargetUrl { .. }
            | ProxyError::RegistryWriteFailure(_)
            | ProxyError::Upstream { .. } => {
                tracing::error!(kind = self.kind(), status = %status, error = %self, "Request failed");
            }
            _ => {
                tracing::warn!(kind = self.kind(), status = %status, error = %self, "Request rejected");
            }
        }
        status.into_response()
    }
}
