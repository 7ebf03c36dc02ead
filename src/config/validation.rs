//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the root domain is a usable hostname
//! - Check path namespaces are absolute and do not swallow `/`
//! - Check the redirect landing page cannot loop back into itself
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EdgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;

use crate::config::schema::EdgeConfig;
use crate::routing::tenant::is_dns_label;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("tenancy.root_domain '{0}' is not a valid domain")]
    InvalidRootDomain(String),

    #[error("tenancy.local_root '{0}' is not a valid label")]
    InvalidLocalRoot(String),

    #[error("{field} '{value}' must start with '/' and must not be '/'")]
    InvalidPath { field: &'static str, value: String },

    #[error("paths.auth_redirect '{0}' must live under paths.auth_prefix")]
    AuthRedirectOutsideAuth(String),

    #[error("tenancy.{field} must not be empty")]
    EmptyHint { field: &'static str },

    #[error("tenancy.tenant_header '{0}' is not a valid header name")]
    InvalidHeaderName(String),

    #[error("{field} '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("backend.base_url '{0}' is not a valid http(s) URL")]
    InvalidBackendUrl(String),

    #[error("listener.default_scheme '{0}' must be http or https")]
    InvalidScheme(String),

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },
}

/// Validate a configuration, collecting every problem.
pub fn validate_config(config: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let tenancy = &config.tenancy;
    let root = tenancy.root_domain.trim_end_matches('.').to_ascii_lowercase();
    if root.is_empty() || !root.split('.').all(is_dns_label) {
        errors.push(ValidationError::InvalidRootDomain(tenancy.root_domain.clone()));
    }
    if !is_dns_label(&tenancy.local_root.to_ascii_lowercase()) {
        errors.push(ValidationError::InvalidLocalRoot(tenancy.local_root.clone()));
    }
    if tenancy.query_param.trim().is_empty() {
        errors.push(ValidationError::EmptyHint { field: "query_param" });
    }
    if tenancy.cookie_name.trim().is_empty() {
        errors.push(ValidationError::EmptyHint { field: "cookie_name" });
    }
    if HeaderName::from_bytes(tenancy.tenant_header.as_bytes()).is_err() {
        errors.push(ValidationError::InvalidHeaderName(tenancy.tenant_header.clone()));
    }

    let paths = &config.paths;
    for (field, value) in [
        ("paths.asset_prefix", &paths.asset_prefix),
        ("paths.api_prefix", &paths.api_prefix),
        ("paths.auth_prefix", &paths.auth_prefix),
        ("paths.auth_entry", &paths.auth_entry),
        ("paths.auth_redirect", &paths.auth_redirect),
        ("paths.protected_prefix", &paths.protected_prefix),
    ] {
        if !is_namespace(value) {
            errors.push(ValidationError::InvalidPath { field, value: value.clone() });
        }
    }
    let auth = paths.auth_prefix.trim_end_matches('/');
    let under_auth = paths
        .auth_redirect
        .strip_prefix(auth)
        .is_some_and(|rest| rest.starts_with('/') && rest.len() > 1);
    if is_namespace(&paths.auth_redirect) && is_namespace(&paths.auth_prefix) && !under_auth {
        errors.push(ValidationError::AuthRedirectOutsideAuth(paths.auth_redirect.clone()));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if !matches!(config.listener.default_scheme.as_str(), "http" | "https") {
        errors.push(ValidationError::InvalidScheme(config.listener.default_scheme.clone()));
    }
    if config.upstream.address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "upstream.address",
            value: config.upstream.address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    match url::Url::parse(&config.backend.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidBackendUrl(config.backend.base_url.clone())),
    }

    for (field, value) in [
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("timeouts.connect_secs", config.timeouts.connect_secs),
        ("backend.timeout_secs", config.backend.timeout_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout { field });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_namespace(path: &str) -> bool {
    path.starts_with('/') && path.trim_end_matches('/') != ""
}
