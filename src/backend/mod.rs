//! Remote backend API access.
//!
//! The edge never calls the backend while routing. This client is for tools and
//! services that talk to the backend on a tenant's behalf.

pub mod client;

pub use client::{BackendClient, BackendError};
