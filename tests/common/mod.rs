//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{body::Body, http::Request, Router};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use tenant_edge::config::EdgeConfig;
use tenant_edge::http::HttpServer;
use tenant_edge::lifecycle::CancellationToken;

/// Start a mock panel upstream that echoes the tenant header and the path.
///
/// Body format: `<x-tenant or "-"> <path and query>`.
pub async fn start_echo_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new().fallback(|req: Request<Body>| async move {
        let tenant = req
            .headers()
            .get("x-tenant")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        let target = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_default();
        format!("{tenant} {target}")
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// A running edge server.
pub struct TestEdge {
    pub addr: SocketAddr,
    pub shutdown: CancellationToken,
    #[allow(dead_code)]
    pub config_tx: mpsc::UnboundedSender<EdgeConfig>,
}

impl TestEdge {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the edge in front of `upstream` with `configure` applied to the defaults.
pub async fn start_edge(upstream: SocketAddr, configure: impl FnOnce(&mut EdgeConfig)) -> TestEdge {
    let mut config = EdgeConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.address = upstream.to_string();
    configure(&mut config);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = CancellationToken::new();
    let (config_tx, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.clone();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    TestEdge { addr, shutdown, config_tx }
}

/// Client that never follows redirects and ignores system proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
