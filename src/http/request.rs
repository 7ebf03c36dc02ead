//! Request inspection helpers.
//!
//! # Responsibilities
//! - Generate and propagate a unique request ID (UUID v4)
//! - Read the request ID back for logging
//! - Work out the scheme the client used, for absolute redirects
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An ID supplied by a trusted load balancer is kept, not replaced

use axum::http::{request::Parts, HeaderMap, HeaderName, Request};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Request ID header name.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Forwarded protocol header set by TLS-terminating proxies.
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Layer that assigns an `X-Request-Id` when the client sent none.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Layer that copies the request's `X-Request-Id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

/// Read the request ID of a request or request head.
pub trait RequestIdExt {
    fn request_id(&self) -> &str;
}

fn request_id_from(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> &str {
        request_id_from(self.headers())
    }
}

impl RequestIdExt for Parts {
    fn request_id(&self) -> &str {
        request_id_from(&self.headers)
    }
}

/// Scheme for redirect URLs: forwarded proto when trusted, else the URI, else `default`.
pub fn request_scheme<'a>(parts: &'a Parts, trust_forwarded: bool, default: &'a str) -> &'a str {
    let forwarded = trust_forwarded
        .then(|| parts.headers.get(X_FORWARDED_PROTO))
        .flatten()
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| matches!(*v, "http" | "https"));

    forwarded
        .or_else(|| parts.uri.scheme_str())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(Body::empty()).unwrap().into_parts().0
    }

    #[test]
    fn test_request_id_fallback() {
        let p = parts(Request::builder().uri("/"));
        assert_eq!(p.request_id(), "unknown");

        let req = Request::builder()
            .header(X_REQUEST_ID, "abc-123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(req.request_id(), "abc-123");
    }

    #[test]
    fn test_scheme_prefers_trusted_forwarded_proto() {
        let p = parts(Request::builder().uri("/").header(X_FORWARDED_PROTO, "https, http"));
        assert_eq!(request_scheme(&p, true, "http"), "https");
        assert_eq!(request_scheme(&p, false, "http"), "http");
    }

    #[test]
    fn test_scheme_ignores_garbage_forwarded_proto() {
        let p = parts(Request::builder().uri("/").header(X_FORWARDED_PROTO, "gopher"));
        assert_eq!(request_scheme(&p, true, "https"), "https");
    }
}
