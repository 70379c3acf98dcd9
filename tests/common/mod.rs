//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header::TRANSFER_ENCODING, Request};
use axum::Router;
use http_body_util::BodyExt;
use subdomain_proxy::{HttpServer, MemoryRegistry, ProxyConfig, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Start a backend that answers every request with `status` and a body of
/// `<name> <request line> host=<host header>`.
///
/// The response also carries connection-scoped headers (`Keep-Alive`, and
/// `X-Hop` listed in `Connection`) that must not reach the client.
pub async fn start_echo_backend(name: &'static str, status: u16) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = Vec::new();
                        let mut chunk = [0u8; 1024];
                        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                            match socket.read(&mut chunk).await {
                                Ok(0) | Err(_) => return,
                                Ok(n) => buf.extend_from_slice(&chunk[..n]),
                            }
                        }

                        let head = String::from_utf8_lossy(&buf).to_string();
                        let request_line = head.lines().next().unwrap_or_default().to_string();
                        let host = head
                            .lines()
                            .find_map(|l| {
                                l.split_once(':')
                                    .filter(|(k, _)| k.eq_ignore_ascii_case("host"))
                                    .map(|(_, v)| v.trim().to_string())
                            })
                            .unwrap_or_default();

                        let body = format!("{name} {request_line} host={host}");
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nX-Backend: {}\r\nKeep-Alive: timeout=5\r\nX-Hop: backend-only\r\nConnection: close, X-Hop\r\n\r\n{}",
                            status_text,
                            body.len(),
                            name,
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a backend that reports the first body chunk of each request on the
/// returned channel as soon as it arrives, then echoes
/// `<transfer-encoding>|<whole body>` once the body is complete.
pub async fn start_streaming_backend() -> (SocketAddr, mpsc::UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();

    let app = Router::new().fallback(move |request: Request<Body>| {
        let tx = tx.clone();
        async move {
            let encoding = request
                .headers()
                .get(TRANSFER_ENCODING)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("none")
                .to_string();

            let mut body = request.into_body();
            let mut received = Vec::new();
            while let Some(frame) = body.frame().await {
                let Ok(data) = frame.unwrap().into_data() else { continue };
                if received.is_empty() {
                    let _ = tx.send(String::from_utf8_lossy(&data).to_string());
                }
                received.extend_from_slice(&data);
            }

            format!("{encoding}|{}", String::from_utf8_lossy(&received))
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, rx)
}

/// Start a backend that answers with an endless chunked body, one `tick`
/// chunk every 50ms. When a write fails the number of chunks written is
/// sent on the returned channel.
pub async fn start_endless_backend() -> (SocketAddr, mpsc::UnboundedReceiver<usize>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let tx = tx.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }

                let head = "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n";
                if socket.write_all(head.as_bytes()).await.is_err() {
                    let _ = tx.send(0);
                    return;
                }

                let mut written = 0usize;
                loop {
                    if socket.write_all(b"4\r\ntick\r\n").await.is_err() {
                        let _ = tx.send(written);
                        return;
                    }
                    written += 1;
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
            });
        }
    });

    (addr, rx)
}

/// Start the proxy on an ephemeral port with an in-memory registry.
pub async fn start_proxy(registry: Arc<MemoryRegistry>) -> (SocketAddr, Shutdown) {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.timeouts.connect_secs = 2;

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, registry);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// HTTP client that never goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
