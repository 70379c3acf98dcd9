//! Host header → routing key extraction.
//!
//! # Responsibilities
//! - Find the host a request was addressed to
//! - Recognize exactly two shapes: `sub.domain.tld` and `www.sub.domain.tld`
//! - Reject everything else (bare domains, single labels, IP literals)
//!
//! # Design Decisions
//! - A trailing `:port` is dropped before matching; an empty port is malformed
//! - The `www` prefix is matched exactly, so `WWW.x.y` routes to `www`
//! - IPv4 literals and bracketed IPv6 literals are rejected outright
//! - Pure functions, no allocation beyond the returned key

use std::net::Ipv4Addr;

use axum::http::{header::HOST, Request};

use crate::error::ProxyError;
use crate::routing::key::RoutingKey;

/// Host the request was addressed to, including any port.
///
/// Prefers the `Host` header and falls back to the URI authority (HTTP/2).
pub fn request_host<B>(request: &Request<B>) -> Option<&str> {
    request
        .headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| request.uri().authority().map(|a| a.as_str()))
}

/// Derive the routing key from a raw host value.
pub fn extract_routing_key(host: &str) -> Result<RoutingKey, ProxyError> {
    let unrecognized = || ProxyError::UnrecognizedHostFormat {
        host: host.to_string(),
    };

    let name = strip_port(host).ok_or_else(unrecognized)?;
    if name.parse::<Ipv4Addr>().is_ok() {
        return Err(unrecognized());
    }

    let labels: Vec<&str> = name.split('.').collect();
    let label = if labels.len() > 2 && labels[0] != "www" {
        labels[0]
    } else if labels.len() == 4 {
        labels[1]
    } else {
        return Err(unrecognized());
    };

    RoutingKey::from_label(label).ok_or_else(unrecognized)
}

/// Drop a trailing `:port`. Returns `None` for IPv6 literals and malformed ports.
fn strip_port(host: &str) -> Option<&str> {
    if host.starts_with('[') {
        return None;
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
            if name.contains(':') {
                None
            } else {
                Some(name)
            }
        }
        Some(_) => None,
        None => Some(host),
    }
}
