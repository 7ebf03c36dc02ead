//! Tenant resolution from request hints.
//!
//! # Data Flow
//! ```text
//! Request parts
//!     → RequestFacts (effective host, path, query tenant, cookie tenant)
//!     → TenantResolver (host → query → cookie, first present wins)
//!     → ResolvedTenant or absent
//! ```
//!
//! The host is trusted most: it is only controllable through DNS and routing
//! infrastructure. Query and cookie hints are a fallback for clients that cannot
//! use subdomains, such as the login hand-off.

use axum::http::{header, request::Parts, HeaderMap};

use crate::config::TenancyConfig;
use crate::routing::host::HostParser;
use crate::routing::tenant::{ResolvedTenant, TenantId, TenantSource};

/// Forwarded host header set by load balancers and CDNs.
pub const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// The per-request inputs the edge router decides on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFacts {
    pub host: Option<String>,
    pub path: String,
    pub query_tenant: Option<String>,
    pub cookie_tenant: Option<String>,
}

impl RequestFacts {
    pub fn new(host: Option<&str>, path: impl Into<String>) -> Self {
        Self {
            host: host.map(str::to_string),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_query_tenant(mut self, tenant: Option<&str>) -> Self {
        self.query_tenant = tenant.map(str::to_string);
        self
    }

    pub fn with_cookie_tenant(mut self, tenant: Option<&str>) -> Self {
        self.cookie_tenant = tenant.map(str::to_string);
        self
    }

    /// Extract the routing inputs from an HTTP request head.
    pub fn from_parts(parts: &Parts, config: &TenancyConfig) -> Self {
        Self {
            host: effective_host(parts, config.trust_forwarded_host),
            path: parts.uri.path().to_string(),
            query_tenant: parts
                .uri
                .query()
                .and_then(|q| query_value(q, &config.query_param)),
            cookie_tenant: cookie_value(&parts.headers, &config.cookie_name),
        }
    }
}

/// Forwarded host (when trusted), then `Host`, then the URI authority.
pub fn effective_host(parts: &Parts, trust_forwarded: bool) -> Option<String> {
    let forwarded = trust_forwarded
        .then(|| header_str(&parts.headers, X_FORWARDED_HOST))
        .flatten()
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    forwarded
        .or_else(|| header_str(&parts.headers, header::HOST.as_str()))
        .map(str::to_string)
        .or_else(|| parts.uri.authority().map(|a| a.to_string()))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn query_value(query: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
}

/// Combines host, query and cookie hints under a fixed precedence.
#[derive(Debug, Clone)]
pub struct TenantResolver {
    host_parser: HostParser,
}

impl TenantResolver {
    pub fn new(host_parser: HostParser) -> Self {
        Self { host_parser }
    }

    pub fn from_config(config: &TenancyConfig) -> Self {
        Self::new(HostParser::from_config(config))
    }

    pub fn host_parser(&self) -> &HostParser {
        &self.host_parser
    }

    /// Resolve the tenant for a request: host, then query, then cookie.
    pub fn resolve(
        &self,
        host: Option<&str>,
        query_tenant: Option<&str>,
        cookie_tenant: Option<&str>,
    ) -> Option<ResolvedTenant> {
        if let Some(tenant) = self.host_parser.parse_tenant(host) {
            return Some(ResolvedTenant { tenant, source: TenantSource::Host });
        }
        if let Some(tenant) = query_tenant.and_then(TenantId::parse) {
            return Some(ResolvedTenant { tenant, source: TenantSource::Query });
        }
        cookie_tenant
            .and_then(TenantId::parse)
            .map(|tenant| ResolvedTenant { tenant, source: TenantSource::Cookie })
    }

    pub fn resolve_facts(&self, facts: &RequestFacts) -> Option<ResolvedTenant> {
        self.resolve(
            facts.host.as_deref(),
            facts.query_tenant.as_deref(),
            facts.cookie_tenant.as_deref(),
        )
    }
}
