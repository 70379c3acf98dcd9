//! Request identification and tracing spans.
//!
//! # Responsibilities
//! - Stamp every request with an `x-request-id` (UUID v4) unless one exists
//! - Open a tracing span carrying the request id
//! - Echo the id on the response
//!
//! The header is forwarded upstream like any other end-to-end header.

use axum::{
    body::Body,
    http::{HeaderName, Request},
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tracing::Span;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Layer that assigns a UUID request id when the caller did not send one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Layer that copies the request id onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Request id header value, if present and valid UTF-8.
pub fn request_id<B>(request: &Request<B>) -> Option<&str> {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
}

/// Span used by the trace layer for each request.
pub fn make_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        request_id = request_id(request).unwrap_or("unknown"),
        method = %request.method(),
        uri = %request.uri(),
    )
}
