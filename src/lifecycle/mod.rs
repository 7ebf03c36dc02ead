//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! SIGTERM/SIGINT (signals.rs)
//!     → CancellationToken::cancel
//!     → server stops accepting → in-flight requests drain → exit
//! ```
//!
//! # Design Decisions
//! - One cancellation token; long-running tasks hold clones or child tokens
//! - Config reload is file-driven (see config::watcher), not signal-driven

pub mod signals;

pub use tokio_util::sync::CancellationToken;
