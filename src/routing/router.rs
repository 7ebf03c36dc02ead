//! Per-request routing decision.
//!
//! # Responsibilities
//! - Classify the path, resolve the tenant once, pick one decision
//! - Stay pure: no I/O, no shared mutable state
//!
//! # Design Decisions
//! - Ordered rule list, first match wins
//! - A missing tenant is never an error; it becomes a redirect
//! - API paths are always rejected here: the real API lives on a separate backend
//!   that clients reach directly
//! - Immutable after construction (thread-safe without locks)

use serde::Serialize;

use crate::config::EdgeConfig;
use crate::routing::classifier::{RouteCategory, RouteClassifier};
use crate::routing::resolver::{RequestFacts, TenantResolver};
use crate::routing::tenant::{ResolvedTenant, TenantId};

/// Status used when rejecting API paths.
pub const API_REJECT_STATUS: u16 = 404;

/// What the hosting runtime should do with a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RoutingDecision {
    PassThrough,
    PassThroughWithTenantHeader { tenant: TenantId },
    RedirectTo { location: String },
    Reject { status: u16 },
}

impl RoutingDecision {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RoutingDecision::PassThrough => "pass_through",
            RoutingDecision::PassThroughWithTenantHeader { .. } => "pass_through_tagged",
            RoutingDecision::RedirectTo { .. } => "redirect",
            RoutingDecision::Reject { .. } => "reject",
        }
    }
}

/// Redirect targets and tagging policy.
#[derive(Debug, Clone)]
pub struct RouteRules {
    /// Where `/` sends everyone.
    pub auth_entry: String,
    /// Tenant-less landing page.
    pub auth_redirect: String,
    /// Tag auth-namespace requests with the tenant header when one is present.
    pub tag_auth_paths: bool,
}

/// Decide a request from its path, category and tenant.
pub fn route(
    path: &str,
    category: RouteCategory,
    tenant: Option<&TenantId>,
    rules: &RouteRules,
) -> RoutingDecision {
    if path == "/" {
        return RoutingDecision::RedirectTo { location: rules.auth_entry.clone() };
    }

    match (category, tenant) {
        (RouteCategory::Asset, _) => RoutingDecision::PassThrough,
        (RouteCategory::ApiPath, _) => RoutingDecision::Reject { status: API_REJECT_STATUS },
        (RouteCategory::AuthRedirectPath, _) => RoutingDecision::PassThrough,
        (RouteCategory::AuthPath, None) | (RouteCategory::ProtectedPath, None) => {
            RoutingDecision::RedirectTo { location: rules.auth_redirect.clone() }
        }
        (RouteCategory::AuthPath, Some(tenant)) => {
            if rules.tag_auth_paths {
                RoutingDecision::PassThroughWithTenantHeader { tenant: tenant.clone() }
            } else {
                RoutingDecision::PassThrough
            }
        }
        (_, Some(tenant)) => RoutingDecision::PassThroughWithTenantHeader { tenant: tenant.clone() },
        (_, None) => RoutingDecision::PassThrough,
    }
}

/// Everything decided for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub category: RouteCategory,
    pub tenant: Option<ResolvedTenant>,
    pub decision: RoutingDecision,
}

/// Compiled edge routing rules.
#[derive(Debug, Clone)]
pub struct EdgeRouter {
    classifier: RouteClassifier,
    resolver: TenantResolver,
    rules: RouteRules,
}

impl EdgeRouter {
    pub fn new(classifier: RouteClassifier, resolver: TenantResolver, rules: RouteRules) -> Self {
        Self { classifier, resolver, rules }
    }

    pub fn from_config(config: &EdgeConfig) -> Self {
        Self::new(
            RouteClassifier::from_config(&config.paths),
            TenantResolver::from_config(&config.tenancy),
            RouteRules {
                auth_entry: config.paths.auth_entry.clone(),
                auth_redirect: config.paths.auth_redirect.clone(),
                tag_auth_paths: config.tenancy.tag_auth_paths,
            },
        )
    }

    pub fn classifier(&self) -> &RouteClassifier {
        &self.classifier
    }

    pub fn resolver(&self) -> &TenantResolver {
        &self.resolver
    }

    /// Classify, resolve once, and route.
    pub fn decide(&self, facts: &RequestFacts) -> Decision {
        let category = self.classifier.classify(&facts.path);
        let tenant = self.resolver.resolve_facts(facts);
        let decision = route(
            &facts.path,
            category,
            tenant.as_ref().map(|r| &r.tenant),
            &self.rules,
        );
        Decision { category, tenant, decision }
    }
}
