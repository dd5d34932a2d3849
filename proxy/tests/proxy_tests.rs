//! Request-handling tests for the revocation proxy, against a nullable
//! upstream and telemetry sink.

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{Method, Request, StatusCode};
use edoc_nullables::{NullTelemetry, NullUpstream};
use edoc_proxy::{
    router, BlockReason, CacheOutcome, CacheTier, Decision, ProxyConfig, ProxyRequest,
    RevocationProxy,
};
use std::sync::Arc;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const VIEWER: &str = "https://edocviewer.app";
const OCSP: &str = "https://ocsp.sk.ee/";
const CRL: &str = "http://crl.eparaksts.lv/crl/eparaksts_2023.crl";

struct Harness {
    proxy: Arc<RevocationProxy>,
    upstream: Arc<NullUpstream>,
    telemetry: Arc<NullTelemetry>,
}

fn harness() -> Harness {
    let upstream = Arc::new(NullUpstream::new());
    let telemetry = Arc::new(NullTelemetry::new());
    let proxy = RevocationProxy::new(&ProxyConfig::default(), upstream.clone(), telemetry.clone())
        .expect("default config is valid");
    Harness {
        proxy: Arc::new(proxy),
        upstream,
        telemetry,
    }
}

fn post(origin: &str, destination: &str, body: &'static [u8]) -> ProxyRequest {
    ProxyRequest {
        method: Method::POST,
        content_type: Some("application/ocsp-request".into()),
        body: Bytes::from_static(body),
        ..ProxyRequest::get(Some(origin), destination)
    }
}

// ---------------------------------------------------------------------------
// Trust boundaries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn foreign_origin_is_forbidden_before_any_fetch() {
    let h = harness();
    let response = h
        .proxy
        .handle(ProxyRequest::get(Some("https://evil.example"), OCSP))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body, Bytes::from_static(b"Forbidden"));
    assert!(response.header("access-control-allow-origin").is_none());
    assert_eq!(h.upstream.request_count(), 0);
}

#[tokio::test]
async fn missing_origin_is_forbidden() {
    let h = harness();
    let response = h.proxy.handle(ProxyRequest::get(None, OCSP)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(h.upstream.request_count(), 0);
}

#[tokio::test]
async fn preview_deployment_origin_is_allowed() {
    let h = harness();
    let origin = "https://3f2a9c1b.edocviewer.pages.dev";
    let response = h.proxy.handle(ProxyRequest::get(Some(origin), OCSP)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("access-control-allow-origin"), Some(origin));
}

#[tokio::test]
async fn arbitrary_certificate_file_host_is_rejected() {
    let h = harness();
    let response = h
        .proxy
        .handle(ProxyRequest::get(Some(VIEWER), "https://evil.example/cert.crt"))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, Bytes::from_static(b"Destination not allowed"));
    assert_eq!(h.upstream.request_count(), 0);
}

#[tokio::test]
async fn missing_url_is_a_bad_request() {
    let h = harness();
    let request = ProxyRequest {
        destination: None,
        ..ProxyRequest::get(Some(VIEWER), "")
    };
    let response = h.proxy.handle(request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, Bytes::from_static(b"Missing url parameter"));
}

#[tokio::test]
async fn other_methods_are_not_allowed() {
    let h = harness();
    for method in [Method::PUT, Method::DELETE, Method::PATCH] {
        let request = ProxyRequest {
            method,
            ..ProxyRequest::get(Some(VIEWER), OCSP)
        };
        let response = h.proxy.handle(request).await;
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    }
    assert_eq!(h.upstream.request_count(), 0);
}

#[tokio::test]
async fn preflight_advertises_cors_for_allowed_origin_only() {
    let h = harness();
    let preflight = ProxyRequest {
        method: Method::OPTIONS,
        ..ProxyRequest::get(Some(VIEWER), OCSP)
    };
    let response = h.proxy.handle(preflight.clone()).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("access-control-allow-origin"), Some(VIEWER));
    assert_eq!(
        response.header("access-control-allow-methods"),
        Some("GET, POST, OPTIONS")
    );
    assert_eq!(response.header("access-control-max-age"), Some("86400"));
    assert_eq!(response.header("vary"), Some("Origin"));

    let foreign = ProxyRequest {
        origin: Some("https://evil.example".into()),
        ..preflight
    };
    assert_eq!(h.proxy.handle(foreign).await.status, StatusCode::FORBIDDEN);
    assert_eq!(h.upstream.request_count(), 0);
}

// ---------------------------------------------------------------------------
// Relaying and caching
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ocsp_get_is_relayed_with_cors_and_short_ttl() {
    let h = harness();
    h.upstream.respond(
        OCSP,
        StatusCode::OK,
        Some("application/ocsp-response"),
        b"\x30\x03\x0a\x01\x00",
    );

    let response = h.proxy.handle(ProxyRequest::get(Some(VIEWER), OCSP)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("access-control-allow-origin"), Some(VIEWER));
    assert_eq!(response.header("cache-control"), Some("public, max-age=600"));
    assert_eq!(
        response.header("content-type"),
        Some("application/ocsp-response")
    );
    assert_eq!(response.body, Bytes::from_static(b"\x30\x03\x0a\x01\x00"));
}

#[tokio::test]
async fn crl_is_cached_for_hours_and_served_from_cache() {
    let h = harness();
    h.upstream.respond(CRL, StatusCode::OK, None, b"crl-bytes");

    let first = h.proxy.handle(ProxyRequest::get(Some(VIEWER), CRL)).await;
    assert_eq!(first.header("cache-control"), Some("public, max-age=21600"));
    assert_eq!(first.header("content-type"), Some("application/octet-stream"));

    let second = h
        .proxy
        .handle(ProxyRequest::get(Some("http://localhost:8080"), CRL))
        .await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body, Bytes::from_static(b"crl-bytes"));
    assert_eq!(
        second.header("access-control-allow-origin"),
        Some("http://localhost:8080")
    );
    assert_eq!(h.upstream.request_count(), 1);

    let events = h.telemetry.events();
    assert_eq!(events[0].cache, Some(CacheOutcome::Miss));
    assert_eq!(events[1].cache, Some(CacheOutcome::Hit));
    assert_eq!(events[1].tier, Some(CacheTier::Crl));
}

#[tokio::test]
async fn non_200_responses_are_relayed_but_not_cached() {
    let h = harness();
    h.upstream.respond(CRL, StatusCode::NOT_FOUND, Some("text/html"), b"gone");

    for _ in 0..2 {
        let response = h.proxy.handle(ProxyRequest::get(Some(VIEWER), CRL)).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
    assert_eq!(h.upstream.request_count(), 2);
}

#[tokio::test]
async fn post_forwards_body_and_is_never_cached() {
    let h = harness();
    h.upstream.respond(
        OCSP,
        StatusCode::OK,
        Some("application/ocsp-response"),
        b"ocsp-answer",
    );

    for _ in 0..2 {
        let response = h.proxy.handle(post(VIEWER, OCSP, b"ocsp-request")).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.header("cache-control"), Some("no-store"));
        assert_eq!(response.header("access-control-allow-origin"), Some(VIEWER));
    }

    let requests = h.upstream.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].body, Bytes::from_static(b"ocsp-request"));
    assert_eq!(
        requests[0].content_type.as_deref(),
        Some("application/ocsp-request")
    );
}

#[tokio::test]
async fn upstream_failure_becomes_bad_gateway() {
    let h = harness();
    h.upstream.fail(OCSP, "connection refused");

    let response = h.proxy.handle(ProxyRequest::get(Some(VIEWER), OCSP)).await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        response.body,
        Bytes::from_static(b"Proxy error: connection refused")
    );
    assert_eq!(h.proxy.metrics().upstream_failures.get(), 1);
}

#[tokio::test]
async fn every_request_is_logged() {
    let h = harness();
    h.proxy
        .handle(ProxyRequest::get(Some("https://evil.example"), OCSP))
        .await;
    h.proxy
        .handle(ProxyRequest::get(Some(VIEWER), "https://evil.example/x.crl"))
        .await;
    h.proxy.handle(ProxyRequest::get(Some(VIEWER), OCSP)).await;

    let events = h.telemetry.events();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].decision, Decision::Blocked);
    assert_eq!(events[0].reason, Some(BlockReason::Origin));
    assert_eq!(events[1].reason, Some(BlockReason::Destination));
    assert_eq!(events[1].status, 400);
    assert_eq!(events[2].decision, Decision::Allowed);
    assert_eq!(events[2].tier, Some(CacheTier::Ocsp));
    assert_eq!(events[2].destination.as_deref(), Some(OCSP));
}

#[test]
fn production_wiring_with_telemetry_endpoint() {
    let config = ProxyConfig {
        telemetry_endpoint: Some("https://logs.edocviewer.test/ingest".into()),
        ..ProxyConfig::default()
    };
    assert!(RevocationProxy::from_config(&config).is_ok());
}

// ---------------------------------------------------------------------------
// HTTP surface
// ---------------------------------------------------------------------------

#[tokio::test]
async fn router_extracts_origin_and_url() {
    let h = harness();
    let app = router(h.proxy.clone(), false);

    let request = Request::builder()
        .method("GET")
        .uri("/?url=https%3A%2F%2Focsp.sk.ee%2F")
        .header("origin", VIEWER)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], VIEWER);
    assert_eq!(h.upstream.requests()[0].url, OCSP);
}

#[tokio::test]
async fn router_and_direct_requests_share_cache_entries() {
    let h = harness();
    let app = router(h.proxy.clone(), false);

    let request = Request::builder()
        .uri("/?url=https%3A%2F%2Focsp.sk.ee%2F")
        .header("origin", VIEWER)
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.oneshot(request).await.unwrap().status(), StatusCode::OK);

    let direct = h.proxy.handle(ProxyRequest::get(Some(VIEWER), OCSP)).await;
    assert_eq!(direct.status, StatusCode::OK);
    assert_eq!(h.upstream.request_count(), 1);
    assert_eq!(h.telemetry.events()[1].cache, Some(CacheOutcome::Hit));
}

#[tokio::test]
async fn router_rejects_foreign_origin() {
    let h = harness();
    let app = router(h.proxy.clone(), false);

    let request = Request::builder()
        .uri("/?url=https%3A%2F%2Focsp.sk.ee%2F")
        .header("origin", "https://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"Forbidden");
}

#[tokio::test]
async fn metrics_endpoint_when_enabled() {
    let h = harness();
    h.proxy.handle(ProxyRequest::get(None, OCSP)).await;
    let app = router(h.proxy.clone(), true);

    let request = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("edoc_proxy_requests_blocked_total{reason=\"origin\"} 1"));
}
