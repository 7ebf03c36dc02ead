//! Host header parsing.
//!
//! # Responsibilities
//! - Strip the port and normalize case
//! - Recognize local subdomain development hosts (`acme.localhost:3000`)
//! - Recognize production subdomains under the configured root domain
//! - Fall back to the first label for unanticipated multi-label hosts
//!
//! # Design Decisions
//! - The local-subdomain rule runs before the generic multi-label fallback,
//!   otherwise two-label local hosts would be misread
//! - The root domain is configuration, so staging roots need no code change
//! - IP literals never carry a tenant

use std::net::Ipv4Addr;

use crate::config::TenancyConfig;
use crate::routing::tenant::TenantId;

/// Derives a tenant label from a `hostname[:port]` string.
#[derive(Debug, Clone)]
pub struct HostParser {
    root_labels: Vec<String>,
    local_root: String,
}

impl HostParser {
    pub fn new(root_domain: &str, local_root: &str) -> Self {
        Self {
            root_labels: split_labels(&normalize(root_domain)),
            local_root: normalize(local_root),
        }
    }

    pub fn from_config(config: &TenancyConfig) -> Self {
        Self::new(&config.root_domain, &config.local_root)
    }

    /// Parse a host into a tenant, or `None` when the host carries no tenant.
    pub fn parse_tenant(&self, host: Option<&str>) -> Option<TenantId> {
        let host = host.map(str::trim).filter(|h| !h.is_empty())?;

        // Bracketed IPv6 literal, e.g. "[::1]:3000".
        if host.starts_with('[') {
            return None;
        }

        let hostname = normalize(host.split(':').next().unwrap_or(host));
        if hostname.parse::<Ipv4Addr>().is_ok() {
            return None;
        }

        let labels = split_labels(&hostname);

        if labels.len() == 1 && labels[0] == self.local_root {
            return None;
        }

        if labels.len() == 2 && labels[1] == self.local_root {
            return TenantId::parse(&labels[0]);
        }

        if labels.len() >= 3 && self.is_under_root(&labels) {
            let root_len = self.root_labels.len();
            if labels.len() > root_len {
                return TenantId::parse(&labels[labels.len() - root_len - 1]);
            }
            // The bare root domain itself.
            return None;
        }

        if labels.len() > 2 {
            return TenantId::parse(&labels[0]);
        }

        None
    }

    fn is_under_root(&self, labels: &[String]) -> bool {
        let root_len = self.root_labels.len();
        root_len > 0 && labels.len() >= root_len && labels[labels.len() - root_len..] == self.root_labels[..]
    }
}

fn normalize(host: &str) -> String {
    host.trim().trim_end_matches('.').to_ascii_lowercase()
}

fn split_labels(host: &str) -> Vec<String> {
    if host.is_empty() {
        return Vec::new();
    }
    host.split('.').map(str::to_string).collect()
}
