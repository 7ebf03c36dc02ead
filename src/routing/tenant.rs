//! Tenant identifiers.
//!
//! A tenant is a customer organization addressed by a subdomain label. The same
//! label shape is enforced no matter which request hint carried it, so a value
//! that reaches the `X-Tenant` header is always a plain DNS label.

use serde::Serialize;
use std::fmt;

/// Maximum length of a single DNS label.
const MAX_LABEL_LEN: usize = 63;

/// Opaque, lowercase tenant label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Parse a raw hint into a tenant label.
    ///
    /// Returns `None` for empty or malformed input; callers treat that as
    /// "tenant absent" rather than an error.
    pub fn parse(raw: &str) -> Option<Self> {
        let label = raw.trim().to_ascii_lowercase();
        if is_dns_label(&label) {
            Some(Self(label))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Which request hint produced the tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantSource {
    Host,
    Query,
    Cookie,
}

impl TenantSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantSource::Host => "host",
            TenantSource::Query => "query",
            TenantSource::Cookie => "cookie",
        }
    }
}

/// A tenant together with the hint it was taken from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTenant {
    pub tenant: TenantId,
    pub source: TenantSource,
}

/// Lowercase DNS label: `[a-z0-9-]{1,63}` without a leading or trailing hyphen.
pub(crate) fn is_dns_label(label: &str) -> bool {
    if label.is_empty() || label.len() > MAX_LABEL_LEN {
        return false;
    }
    if label.starts_with('-') || label.ends_with('-') {
        return false;
    }
    label
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}
