//! End-to-end tests of tenant routing in front of a mock panel upstream.

use std::time::Duration;

use reqwest::StatusCode;

mod common;

#[tokio::test]
async fn test_production_subdomain_is_tagged_and_forwarded() {
    let upstream = common::start_echo_upstream().await;
    let edge = common::start_edge(upstream, |_| {}).await;

    let res = common::client()
        .get(edge.url("/painel/cliente?page=2"))
        .header("x-forwarded-host", "acme.planvita.com.br")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "acme /painel/cliente?page=2");
}

#[tokio::test]
async fn test_local_root_without_tenant_redirects_to_landing() {
    let upstream = common::start_echo_upstream().await;
    let edge = common::start_edge(upstream, |_| {}).await;

    let res = common::client()
        .get(edge.url("/painel/cliente"))
        .header("x-forwarded-host", "localhost:3000")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        res.headers()["location"],
        "http://localhost:3000/login/redirecionamento"
    );
}

#[tokio::test]
async fn test_landing_page_is_reachable_without_tenant() {
    let upstream = common::start_echo_upstream().await;
    let edge = common::start_edge(upstream, |_| {}).await;

    let res = common::client()
        .get(edge.url("/login/redirecionamento"))
        .header("x-forwarded-host", "localhost:3000")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "- /login/redirecionamento");
}

#[tokio::test]
async fn test_root_redirects_to_login_for_everyone() {
    let upstream = common::start_echo_upstream().await;
    let edge = common::start_edge(upstream, |_| {}).await;
    let client = common::client();

    for host in ["acme.planvita.com.br", "localhost:3000"] {
        let res = client
            .get(edge.url("/"))
            .header("x-forwarded-host", host)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(res.headers()["location"], format!("http://{host}/login").as_str());
    }
}

#[tokio::test]
async fn test_api_paths_are_rejected() {
    let upstream = common::start_echo_upstream().await;
    let edge = common::start_edge(upstream, |_| {}).await;
    let client = common::client();

    for host in ["anything", "acme.planvita.com.br"] {
        let res = client
            .get(edge.url("/api/titular"))
            .header("x-forwarded-host", host)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_assets_bypass_tenant_logic() {
    let upstream = common::start_echo_upstream().await;
    let edge = common::start_edge(upstream, |_| {}).await;

    let res = common::client()
        .get(edge.url("/_next/static/chunks/main.js"))
        .header("x-forwarded-host", "acme.localhost:3000")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "- /_next/static/chunks/main.js");
}

#[tokio::test]
async fn test_login_handoff_with_query_and_cookie() {
    let upstream = common::start_echo_upstream().await;
    let edge = common::start_edge(upstream, |_| {}).await;
    let client = common::client();

    let res = client
        .get(edge.url("/login?tenant=acme"))
        .header("x-forwarded-host", "localhost:3000")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "acme /login?tenant=acme");

    let res = client
        .get(edge.url("/painel"))
        .header("x-forwarded-host", "localhost:3000")
        .header("cookie", "tenant=beta")
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "beta /painel");
}

#[tokio::test]
async fn test_host_tenant_beats_query_tenant() {
    let upstream = common::start_echo_upstream().await;
    let edge = common::start_edge(upstream, |_| {}).await;

    let res = common::client()
        .get(edge.url("/painel?tenant=other"))
        .header("x-forwarded-host", "acme.planvita.com.br")
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "acme /painel?tenant=other");
}

#[tokio::test]
async fn test_client_cannot_spoof_tenant_header() {
    let upstream = common::start_echo_upstream().await;
    let edge = common::start_edge(upstream, |_| {}).await;

    let res = common::client()
        .get(edge.url("/painel"))
        .header("x-forwarded-host", "acme.planvita.com.br")
        .header("x-tenant", "victim")
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "acme /painel");
}

#[tokio::test]
async fn test_health_check_and_request_id() {
    let upstream = common::start_echo_upstream().await;
    let edge = common::start_edge(upstream, |_| {}).await;

    let res = common::client().get(edge.url("/healthz")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "ok");

    let res = common::client()
        .get(edge.url("/api/x"))
        .header("x-request-id", "req-42")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn test_dead_upstream_is_bad_gateway() {
    let upstream = common::unused_addr().await;
    let edge = common::start_edge(upstream, |_| {}).await;

    let res = common::client()
        .get(edge.url("/painel"))
        .header("x-forwarded-host", "acme.planvita.com.br")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_config_update_swaps_rules() {
    let upstream = common::start_echo_upstream().await;
    let edge = common::start_edge(upstream, |_| {}).await;
    let client = common::client();

    let before = client
        .get(edge.url("/painel?org=acme"))
        .header("x-forwarded-host", "localhost:3000")
        .send()
        .await
        .unwrap();
    assert_eq!(before.status(), StatusCode::TEMPORARY_REDIRECT);

    let mut config = tenant_edge::EdgeConfig::default();
    config.upstream.address = upstream.to_string();
    config.tenancy.query_param = "org".into();
    edge.config_tx.send(config).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let after = client
        .get(edge.url("/painel?org=acme"))
        .header("x-forwarded-host", "localhost:3000")
        .send()
        .await
        .unwrap();
    assert_eq!(after.status(), StatusCode::OK);
    assert_eq!(after.text().await.unwrap(), "acme /painel?org=acme");
}

#[tokio::test]
async fn test_shutdown_stops_server() {
    let upstream = common::start_echo_upstream().await;
    let edge = common::start_edge(upstream, |_| {}).await;

    edge.shutdown.cancel();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let res = common::client()
        .get(edge.url("/healthz"))
        .timeout(Duration::from_secs(2))
        .send()
        .await;
    assert!(res.is_err());
}
