//! Path classification.
//!
//! # Responsibilities
//! - Map a request path to a `RouteCategory`
//! - Know nothing about tenants
//!
//! # Design Decisions
//! - Prefix matching is segment-aware: `/painel` matches `/painel/x`, not `/painelx`
//! - API prefix is checked before the file-extension rule, so `/api/x.json`
//!   never slips through as an asset
//! - No regex in the hot path

use serde::Serialize;

use crate::config::PathsConfig;

/// Category of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteCategory {
    Asset,
    ApiPath,
    AuthPath,
    AuthRedirectPath,
    ProtectedPath,
    Other,
}

impl RouteCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteCategory::Asset => "asset",
            RouteCategory::ApiPath => "api",
            RouteCategory::AuthPath => "auth",
            RouteCategory::AuthRedirectPath => "auth_redirect",
            RouteCategory::ProtectedPath => "protected",
            RouteCategory::Other => "other",
        }
    }
}

/// Classifies paths against the configured namespaces.
#[derive(Debug, Clone)]
pub struct RouteClassifier {
    asset_prefix: String,
    api_prefix: String,
    auth_prefix: String,
    auth_redirect: String,
    protected_prefix: String,
}

impl RouteClassifier {
    pub fn from_config(paths: &PathsConfig) -> Self {
        Self {
            asset_prefix: trim_slash(&paths.asset_prefix),
            api_prefix: trim_slash(&paths.api_prefix),
            auth_prefix: trim_slash(&paths.auth_prefix),
            auth_redirect: trim_slash(&paths.auth_redirect),
            protected_prefix: trim_slash(&paths.protected_prefix),
        }
    }

    pub fn classify(&self, path: &str) -> RouteCategory {
        if under(path, &self.asset_prefix) {
            RouteCategory::Asset
        } else if under(path, &self.api_prefix) {
            RouteCategory::ApiPath
        } else if has_file_extension(path) {
            RouteCategory::Asset
        } else if under(path, &self.auth_redirect) {
            RouteCategory::AuthRedirectPath
        } else if under(path, &self.auth_prefix) {
            RouteCategory::AuthPath
        } else if under(path, &self.protected_prefix) {
            RouteCategory::ProtectedPath
        } else {
            RouteCategory::Other
        }
    }
}

fn trim_slash(prefix: &str) -> String {
    prefix.trim_end_matches('/').to_string()
}

/// True when `path` equals `prefix` or continues it with a `/`.
fn under(path: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return false;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Last segment ends in `.ext` with an alphanumeric extension, e.g. `favicon.ico`.
fn has_file_extension(path: &str) -> bool {
    let segment = path.rsplit('/').next().unwrap_or(path);
    match segment.rsplit_once('.') {
        Some((stem, ext)) => {
            !stem.is_empty() && !ext.is_empty() && ext.bytes().all(|b| b.is_ascii_alphanumeric())
        }
        None => false,
    }
}
