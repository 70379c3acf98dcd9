//! Single-use forwarding of one request/response pair.
//!
//! # Responsibilities
//! - Build a fresh upstream client for the resolved target
//! - Rewrite the request URI onto the target, keep every end-to-end header
//! - Stream the request body up and the response body back without buffering
//!
//! # Design Decisions
//! - Nothing is shared between requests: the connector, pool and client
//!   live exactly as long as one exchange
//! - Dropping the response body (client went away) drops the upstream
//!   connection with it
//! - Upstream requests always go out as HTTP/1.1

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header::HOST, HeaderValue, Request, Response, Version},
};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::dispatch::headers::{append_forwarded_for, strip_hop_by_hop};
use crate::dispatch::target::BackendTarget;
use crate::error::ProxyError;

type UpstreamClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Forwards exactly one request to a backend target.
pub struct Dispatcher {
    target: BackendTarget,
    client: UpstreamClient,
}

impl Dispatcher {
    /// Build dispatch state for one request.
    pub fn new(target: BackendTarget, connect_timeout: Duration) -> Self {
        let mut http = HttpConnector::new();
        http.enforce_http(false);
        http.set_connect_timeout(Some(connect_timeout));

        let https = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .wrap_connector(http);

        let client = Client::builder(TokioExecutor::new()).build(https);
        Self { target, client }
    }

    /// Send `request` upstream and hand back the streaming response.
    pub async fn forward(
        self,
        request: Request<Body>,
        client_addr: Option<SocketAddr>,
    ) -> Result<Response<Body>, ProxyError> {
        let (mut parts, body) = request.into_parts();

        // HTTP/2 callers carry the host in the URI authority only.
        if !parts.headers.contains_key(HOST) {
            if let Some(value) = parts
                .uri
                .authority()
                .and_then(|a| HeaderValue::from_str(a.as_str()).ok())
            {
                parts.headers.insert(HOST, value);
            }
        }

        parts.uri = self.target.rewrite_uri(&parts.uri)?;
        parts.version = Version::HTTP_11;
        strip_hop_by_hop(&mut parts.headers);
        if let Some(addr) = client_addr {
            append_forwarded_for(&mut parts.headers, addr.ip());
        }

        tracing::debug!(
            target = %self.target,
            uri = %parts.uri,
            "Forwarding request upstream"
        );

        let response = self
            .client
            .request(Request::from_parts(parts, body))
            .await
            .map_err(|e| ProxyError::Upstream {
                target: self.target.to_string(),
                reason: format!("{e:?}"),
            })?;

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

/// Parse `raw_target` and forward `request` to it.
pub async fn dispatch(
    raw_target: &str,
    request: Request<Body>,
    client_addr: Option<SocketAddr>,
    connect_timeout: Duration,
) -> Result<Response<Body>, ProxyError> {
    let target = BackendTarget::parse(raw_target)?;
    Dispatcher::new(target, connect_timeout)
        .forward(request, client_addr)
        .await
}
