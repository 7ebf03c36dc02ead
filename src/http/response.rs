//! Terminal responses produced by the edge itself.
//!
//! # Responsibilities
//! - Build redirect responses with absolute `Location` URLs
//! - Build bare status responses for rejections and upstream failures
//!
//! # Design Decisions
//! - Redirects are `307 Temporary Redirect` so the method is preserved
//! - The original query string survives the redirect (login hand-off keeps its hint)
//! - If scheme and host cannot form a same-origin URL, fall back to a relative `Location`

use std::str::FromStr;

use axum::body::Body;
use axum::http::{header, uri::Authority, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use url::Url;

/// Absolute redirect target preserving scheme and host.
pub fn redirect_location(scheme: &str, host: Option<&str>, path: &str, query: Option<&str>) -> String {
    let absolute = host.and_then(|h| origin_url(scheme, h)).map(|mut url| {
        url.set_path(path);
        url.set_query(query);
        url.to_string()
    });

    absolute.unwrap_or_else(|| match query {
        Some(q) => format!("{path}?{q}"),
        None => path.to_string(),
    })
}

/// `scheme://host` only when the host is a bare `hostname[:port]` authority.
///
/// Userinfo (`x@evil.com`) or anything that makes the URL parser land on a
/// different host is refused.
fn origin_url(scheme: &str, host: &str) -> Option<Url> {
    let authority = Authority::from_str(host.trim()).ok()?;
    if authority.as_str().contains('@') {
        return None;
    }
    let url = Url::parse(&format!("{scheme}://{authority}")).ok()?;
    let expected = authority.host().trim_start_matches('[').trim_end_matches(']');
    let actual = url.host_str()?.trim_start_matches('[').trim_end_matches(']');
    actual.eq_ignore_ascii_case(expected).then_some(url)
}

/// `307` with the given `Location`.
pub fn redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => {
            let mut response = Response::new(Body::empty());
            *response.status_mut() = StatusCode::TEMPORARY_REDIRECT;
            response.headers_mut().insert(header::LOCATION, value);
            response
        }
        Err(_) => {
            tracing::warn!(location = %location, "Redirect target is not a valid header value");
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}

/// Bare status response.
pub fn reject(status: u16) -> Response {
    StatusCode::from_u16(status)
        .unwrap_or(StatusCode::NOT_FOUND)
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_location_keeps_port_and_query() {
        assert_eq!(
            redirect_location("http", Some("localhost:3000"), "/login/redirecionamento", Some("tenant=x")),
            "http://localhost:3000/login/redirecionamento?tenant=x"
        );
        assert_eq!(
            redirect_location("https", Some("acme.planvita.com.br"), "/login", None),
            "https://acme.planvita.com.br/login"
        );
    }

    #[test]
    fn test_relative_location_without_host() {
        assert_eq!(redirect_location("http", None, "/login", None), "/login");
        assert_eq!(redirect_location("http", Some(""), "/login", Some("a=1")), "/login?a=1");
        assert_eq!(redirect_location("http", Some("bad host"), "/login", None), "/login");
    }

    #[test]
    fn test_location_never_leaves_the_request_origin() {
        assert_eq!(
            redirect_location("http", Some("x@evil.com"), "/login/redirecionamento", None),
            "/login/redirecionamento"
        );
        assert_eq!(
            redirect_location("https", Some("acme.planvita.com.br@evil.com:443"), "/login", Some("a=1")),
            "/login?a=1"
        );
        assert_eq!(redirect_location("http", Some("evil.com/x"), "/login", None), "/login");
        assert_eq!(
            redirect_location("http", Some("Acme.Localhost:3000"), "/login", None),
            "http://acme.localhost:3000/login"
        );
    }

    #[test]
    fn test_redirect_response() {
        let response = redirect("/login");
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[test]
    fn test_reject_response() {
        assert_eq!(reject(404).status(), StatusCode::NOT_FOUND);
        assert_eq!(reject(1000).status(), StatusCode::NOT_FOUND);
    }
}
