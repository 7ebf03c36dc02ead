//! HTTP hosting runtime.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, timeout, trace)
//!     → middleware/tenant_routing.rs (decide and apply)
//!         → redirect / reject (response.rs)
//!         → pass through, optionally tagged with the tenant header
//!     → server.rs forward_handler → panel upstream
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use middleware::TenantContext;
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{HttpServer, ServerError};
