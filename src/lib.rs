//! Tenant edge router library.
//!
//! Resolves the tenant of every inbound panel request from its host, query or
//! cookie, and decides whether to forward, tag, redirect or reject it.

pub mod backend;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::EdgeConfig;
pub use http::HttpServer;
pub use routing::{EdgeRouter, RequestFacts, RoutingDecision};
