//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_decisions_total` (counter): decisions by kind and route category
//! - `edge_tenant_resolved_total` (counter): resolved tenants by winning hint
//! - `edge_request_duration_seconds` (histogram): end-to-end latency
//! - `edge_upstream_errors_total` (counter): failed forwards to the panel upstream
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so tests need no setup
//! - Tenant labels are never used as metric labels (unbounded cardinality)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::routing::{Decision, TenantSource};

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

/// Record one routing decision.
pub fn record_decision(decided: &Decision) {
    metrics::counter!(
        "edge_decisions_total",
        "decision" => decided.decision.kind(),
        "category" => decided.category.as_str()
    )
    .increment(1);

    if let Some(resolved) = &decided.tenant {
        record_tenant_source(resolved.source);
    }
}

fn record_tenant_source(source: TenantSource) {
    metrics::counter!("edge_tenant_resolved_total", "source" => source.as_str()).increment(1);
}

/// Record request latency.
pub fn record_duration(decision: &'static str, start: Instant) {
    metrics::histogram!("edge_request_duration_seconds", "decision" => decision)
        .record(start.elapsed().as_secs_f64());
}

/// Record a failed upstream forward.
pub fn record_upstream_error() {
    metrics::counter!("edge_upstream_errors_total").increment(1);
}
