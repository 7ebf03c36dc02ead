//! Tenant resolution and request routing.
//!
//! # Data Flow
//! ```text
//! Incoming request (host / forwarded host, path, query, cookie)
//!     → resolver.rs  (RequestFacts, host → query → cookie precedence)
//!     → host.rs      (host label rules)
//!     → classifier.rs (path → RouteCategory)
//!     → router.rs    (ordered rules → RoutingDecision)
//!
//! Rule compilation (at startup and on reload):
//!     EdgeConfig
//!     → EdgeRouter::from_config
//!     → Freeze as immutable EdgeRouter
//! ```
//!
//! # Design Decisions
//! - Pure and synchronous: no I/O, no locks, no suspension points
//! - Deterministic: same input always yields the same decision
//! - First match wins

pub mod classifier;
pub mod host;
pub mod resolver;
pub mod router;
pub mod tenant;

pub use classifier::{RouteCategory, RouteClassifier};
pub use host::HostParser;
pub use resolver::{RequestFacts, TenantResolver};
pub use router::{route, Decision, EdgeRouter, RouteRules, RoutingDecision};
pub use tenant::{ResolvedTenant, TenantId, TenantSource};
