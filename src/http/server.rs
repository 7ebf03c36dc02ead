//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the health check and the edge routing pipeline
//! - Wire up middleware (tracing, timeout, request ID, tenant routing)
//! - Bind server to listener
//! - Forward passed requests to the panel upstream
//! - Swap compiled rules on config reload

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, Scheme},
        Request, StatusCode, Uri,
    },
    middleware,
    response::{IntoResponse, Response},
    Extension,
    routing::get,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::EdgeConfig;
use crate::http::middleware::{tenant_routing_middleware, EdgeRules, SharedRules};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::observability::metrics;

/// Liveness check answered before tenant routing.
pub const HEALTH_PATH: &str = "/healthz";

/// Errors raised while building or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid tenant header name '{0}'")]
    InvalidHeader(String),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub rules: SharedRules,
    pub client: Client<HttpConnector, Body>,
}

/// HTTP server for the tenant edge router.
pub struct HttpServer {
    router: Router,
    config: EdgeConfig,
    rules: SharedRules,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: EdgeConfig) -> Result<Self, ServerError> {
        let rules: SharedRules = Arc::new(ArcSwap::from_pointee(EdgeRules::from_config(&config)?));

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let state = AppState {
            rules: rules.clone(),
            client,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config, rules })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &EdgeConfig, state: AppState) -> Router {
        let edge = Router::new()
            .fallback(forward_handler)
            .layer(middleware::from_fn_with_state(
                state.rules.clone(),
                tenant_routing_middleware,
            ))
            .with_state(state);

        Router::new()
            .route(HEALTH_PATH, get(healthz))
            .fallback_service(edge)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    path = %req.uri().path(),
                    request_id = %req.request_id(),
                )
            }))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// Run the server until `shutdown` is cancelled, applying config updates as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<EdgeConfig>,
        shutdown: CancellationToken,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            root_domain = %self.config.tenancy.root_domain,
            upstream = %self.config.upstream.address,
            "HTTP server starting"
        );

        let rules = self.rules.clone();
        tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                match EdgeRules::from_config(&new_config) {
                    Ok(compiled) => {
                        rules.store(Arc::new(compiled));
                        tracing::info!(
                            root_domain = %new_config.tenancy.root_domain,
                            "Routing rules reloaded"
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Rejected config update, keeping current rules");
                    }
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &EdgeConfig {
        &self.config
    }

    /// The live rule set, for callers that reload outside the update channel.
    pub fn rules(&self) -> SharedRules {
        self.rules.clone()
    }
}

async fn healthz() -> &'static str {
    "ok"
}

/// Forward a request that passed tenant routing to the panel upstream.
async fn forward_handler(
    State(state): State<AppState>,
    Extension(rules): Extension<Arc<EdgeRules>>,
    request: Request<Body>,
) -> Response {
    let upstream = rules.upstream.clone();
    let request_id = request.request_id().to_string();
    let (mut parts, body) = request.into_parts();

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = match Authority::from_str(&upstream) {
        Ok(authority) => Some(authority),
        Err(e) => {
            tracing::error!(request_id = %request_id, upstream = %upstream, error = %e, "Invalid upstream address");
            return (StatusCode::BAD_GATEWAY, "Invalid upstream").into_response();
        }
    };
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(axum::http::uri::PathAndQuery::from_static("/"));
    }
    parts.uri = match Uri::from_parts(uri_parts) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Failed to build upstream URI");
            return (StatusCode::BAD_GATEWAY, "Invalid upstream").into_response();
        }
    };

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, upstream = %upstream, error = %e, "Upstream error");
            metrics::record_upstream_error();
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
