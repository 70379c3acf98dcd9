//! HTTP server setup and request routing.
//!
//! # Responsibilities
//! - Create the Axum Router with the single proxy entry point
//! - Wire up middleware (request ID, tracing)
//! - Serve plaintext or TLS with graceful shutdown
//! - Per request: admin path → registry write, otherwise
//!   host → routing key → registry lookup → dispatch

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::admin;
use crate::config::{AdminConfig, ProxyConfig};
use crate::dispatch::dispatch;
use crate::error::ProxyError;
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::observability::metrics;
use crate::registry::Registry;
use crate::routing::{extract_routing_key, request_host};

/// Time in-flight requests get to finish once TLS shutdown starts.
const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn Registry>,
    pub admin: AdminConfig,
    pub connect_timeout: Duration,
    /// Upper bound on waiting for a backend's response head.
    pub request_timeout: Duration,
}

/// HTTP server for the subdomain proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server around an already connected registry.
    pub fn new(config: ProxyConfig, registry: Arc<dyn Registry>) -> Self {
        let state = AppState {
            registry,
            admin: config.admin.clone(),
            connect_timeout: Duration::from_secs(config.timeouts.connect_secs),
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
        };

        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(propagate_request_id_layer()),
            )
    }

    /// The fully layered router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Serve plaintext HTTP until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, admin_path = %self.config.admin.path, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS until `shutdown` fires.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let hostnames = self
            .config
            .listener
            .tls
            .as_ref()
            .map(|t| t.hostnames.join(","))
            .unwrap_or_default();
        tracing::info!(address = %addr, hostnames = %hostnames, "HTTPS server starting");

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Draining in-flight requests");
            drain.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service_with_connect_info::<SocketAddr>())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Single entry point for every request.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();

    tracing::info!(method = %method, uri = %request.uri(), "Handling request");

    let is_admin = request
        .uri()
        .path_and_query()
        .is_some_and(|pq| pq.as_str() == state.admin.path);

    let (outcome, result) = if is_admin {
        let result = admin::register_mapping(
            state.registry.as_ref(),
            request,
            state.admin.max_body_bytes,
        )
        .await
        .map(IntoResponse::into_response);
        ("admin", result)
    } else {
        ("proxy", route_request(&state, request).await)
    };

    let response = result.unwrap_or_else(IntoResponse::into_response);
    metrics::record_request(&method, response.status().as_u16(), outcome, start_time);
    response
}

/// Host → routing key → registry → dispatch.
async fn route_request(state: &AppState, request: Request<Body>) -> Result<Response, ProxyError> {
    let key = extract_routing_key(request_host(&request).unwrap_or_default())?;

    let target = state.registry.get(key.as_str()).await.map_err(|e| {
        tracing::warn!(routing_key = %key, error = %e, "Registry lookup failed");
        ProxyError::NotFound { key: key.to_string() }
    })?;

    tracing::debug!(routing_key = %key, target = %target, "Resolved backend");

    let client_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let exchange = dispatch(&target, request, client_addr, state.connect_timeout);
    tokio::time::timeout(state.request_timeout, exchange)
        .await
        .map_err(|_| ProxyError::Upstream {
            target: target.clone(),
            reason: format!("no response within {}s", state.request_timeout.as_secs()),
        })?
}
