//! Tenant routing middleware.
//! Applies the edge routing decision before any page handler runs.

use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::config::{EdgeConfig, TenancyConfig};
use crate::http::request::{request_scheme, RequestIdExt};
use crate::http::response;
use crate::http::server::ServerError;
use crate::observability::metrics;
use crate::routing::{EdgeRouter, RequestFacts, RoutingDecision, TenantId, TenantSource};

/// Rules compiled from one configuration snapshot.
#[derive(Debug)]
pub struct EdgeRules {
    pub router: EdgeRouter,
    pub tenancy: TenancyConfig,
    pub tenant_header: HeaderName,
    pub default_scheme: String,
    pub upstream: String,
}

impl EdgeRules {
    pub fn from_config(config: &EdgeConfig) -> Result<Self, ServerError> {
        let tenant_header = HeaderName::from_bytes(config.tenancy.tenant_header.as_bytes())
            .map_err(|_| ServerError::InvalidHeader(config.tenancy.tenant_header.clone()))?;

        Ok(Self {
            router: EdgeRouter::from_config(config),
            tenancy: config.tenancy.clone(),
            tenant_header,
            default_scheme: config.listener.default_scheme.clone(),
            upstream: config.upstream.address.clone(),
        })
    }
}

/// Shared, hot-swappable rule set.
pub type SharedRules = Arc<ArcSwap<EdgeRules>>;

/// Context attached to requests forwarded with a tenant tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TenantContext {
    pub tenant: TenantId,
    pub source: TenantSource,
}

pub async fn tenant_routing_middleware(
    State(rules): State<SharedRules>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    // One snapshot per request, even if a reload lands mid-flight.
    let rules = rules.load_full();

    let (mut parts, body) = req.into_parts();

    // Only the edge may set the tenant header.
    if parts.headers.remove(&rules.tenant_header).is_some() {
        tracing::warn!(request_id = %parts.request_id(), "Dropped client-supplied tenant header");
    }

    // Downstream handlers read this snapshot instead of loading again.
    parts.extensions.insert(rules.clone());

    let facts = RequestFacts::from_parts(&parts, &rules.tenancy);
    let decided = rules.router.decide(&facts);

    tracing::debug!(
        request_id = %parts.request_id(),
        host = ?facts.host,
        path = %facts.path,
        category = decided.category.as_str(),
        tenant = ?decided.tenant.as_ref().map(|t| t.tenant.as_str()),
        source = ?decided.tenant.as_ref().map(|t| t.source.as_str()),
        decision = decided.decision.kind(),
        "Routing decision"
    );
    metrics::record_decision(&decided);

    let response = match &decided.decision {
        RoutingDecision::PassThrough => next.run(Request::from_parts(parts, body)).await,
        RoutingDecision::PassThroughWithTenantHeader { tenant } => {
            match HeaderValue::from_str(tenant.as_str()) {
                Ok(value) => {
                    parts.headers.insert(rules.tenant_header.clone(), value);
                }
                Err(_) => {
                    tracing::error!(tenant = %tenant, "Tenant is not a valid header value");
                }
            }
            if let Some(resolved) = &decided.tenant {
                parts.extensions.insert(TenantContext {
                    tenant: resolved.tenant.clone(),
                    source: resolved.source,
                });
            }
            next.run(Request::from_parts(parts, body)).await
        }
        RoutingDecision::RedirectTo { location } => {
            let scheme = request_scheme(&parts, rules.tenancy.trust_forwarded_host, &rules.default_scheme);
            let target = response::redirect_location(
                scheme,
                facts.host.as_deref(),
                location,
                parts.uri.query(),
            );
            response::redirect(&target)
        }
        RoutingDecision::Reject { status } => response::reject(*status),
    };

    metrics::record_duration(decided.decision.kind(), start);
    response
}
