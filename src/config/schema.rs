//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge router.
//! All types derive Serde traits for deserialization from config files, and every
//! section has defaults matching the production deployment.

use serde::{Deserialize, Serialize};

/// Root configuration for the tenant edge router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EdgeConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Panel frontend that passed requests are forwarded to.
    pub upstream: UpstreamConfig,

    /// Tenant resolution settings.
    pub tenancy: TenancyConfig,

    /// Path namespaces and redirect targets.
    pub paths: PathsConfig,

    /// Remote backend API reached by tenant-scoped clients.
    pub backend: BackendConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Scheme used in redirect URLs when the request does not say otherwise.
    pub default_scheme: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            default_scheme: "http".to_string(),
        }
    }
}

/// Upstream (panel frontend) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream address (e.g., "127.0.0.1:3000").
    pub address: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// How tenants are derived from a request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TenancyConfig {
    /// Production root domain; `<tenant>.<root_domain>` carries a tenant.
    pub root_domain: String,

    /// Local development root; `<tenant>.<local_root>` carries a tenant.
    pub local_root: String,

    /// Prefer `X-Forwarded-Host` / `X-Forwarded-Proto` when present.
    pub trust_forwarded_host: bool,

    /// Query parameter carrying a tenant hint.
    pub query_param: String,

    /// Cookie carrying a tenant hint.
    pub cookie_name: String,

    /// Header injected on tagged pass-through.
    pub tenant_header: String,

    /// Tag auth-namespace requests with the tenant header.
    pub tag_auth_paths: bool,
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            root_domain: "planvita.com.br".to_string(),
            local_root: "localhost".to_string(),
            trust_forwarded_host: true,
            query_param: "tenant".to_string(),
            cookie_name: "tenant".to_string(),
            tenant_header: "x-tenant".to_string(),
            tag_auth_paths: true,
        }
    }
}

/// Path namespaces.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Framework asset namespace.
    pub asset_prefix: String,

    /// API namespace; always rejected at the edge.
    pub api_prefix: String,

    /// Login-related pages.
    pub auth_prefix: String,

    /// Where `/` redirects to.
    pub auth_entry: String,

    /// Tenant-less landing page inside the auth namespace.
    pub auth_redirect: String,

    /// Panel pages that need a tenant.
    pub protected_prefix: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            asset_prefix: "/_next".to_string(),
            api_prefix: "/api".to_string(),
            auth_prefix: "/login".to_string(),
            auth_entry: "/login".to_string(),
            auth_redirect: "/login/redirecionamento".to_string(),
            protected_prefix: "/painel".to_string(),
        }
    }
}

/// Remote backend API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the REST API.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Upstream connection timeout in seconds.
    pub connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            connect_secs: 5,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
