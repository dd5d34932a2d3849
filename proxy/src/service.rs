//! Request handling for the revocation proxy.
//!
//! [`RevocationProxy::handle`] is transport-agnostic: the axum layer in
//! [`crate::server`] only extracts a [`ProxyRequest`] and renders the
//! [`ProxyResponse`]. Checks run in a fixed order and no destination is ever
//! contacted before both the origin and the destination have been admitted.

use axum::body::Bytes;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, CACHE_CONTROL, CONTENT_TYPE, VARY,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use reqwest::Url;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::allowlist::AllowList;
use crate::cache::{CachedResponse, EdgeCache};
use crate::config::{ProxyConfig, TtlConfig};
use crate::error::ProxyError;
use crate::metrics::ProxyMetrics;
use crate::telemetry::{
    BlockReason, CacheOutcome, Decision, HttpTelemetrySink, ProxyLogEvent, TelemetrySink,
    TracingSink,
};
use crate::tier::CacheTier;
use crate::upstream::{HttpUpstream, Upstream, UpstreamRequest, UpstreamResponse};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
const PREFLIGHT_MAX_AGE_SECS: u64 = 86_400;

/// An inbound request, already lifted out of the HTTP framework.
#[derive(Clone, Debug)]
pub struct ProxyRequest {
    pub method: Method,
    /// Path and query of the inbound request; the edge cache key.
    pub cache_key: String,
    pub origin: Option<String>,
    /// The raw `url` query parameter.
    pub destination: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl ProxyRequest {
    pub fn get(origin: Option<&str>, destination: &str) -> Self {
        Self {
            method: Method::GET,
            cache_key: cache_key_for(destination),
            origin: origin.map(str::to_string),
            destination: Some(destination.to_string()),
            content_type: None,
            body: Bytes::new(),
        }
    }
}

/// The path and query a browser sends for `destination`, i.e. the cache key
/// the router derives for the same request.
pub fn cache_key_for(destination: &str) -> String {
    let query = Url::parse_with_params("http://proxy.invalid/", &[("url", destination)])
        .ok()
        .and_then(|url| url.query().map(str::to_string))
        .unwrap_or_default();
    format!("/?{query}")
}

#[derive(Clone, Debug)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ProxyResponse {
    fn text(status: StatusCode, message: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
        Self {
            status,
            headers,
            body: Bytes::from(message.into()),
        }
    }

    fn from_cached(cached: CachedResponse) -> Self {
        let mut headers = HeaderMap::new();
        let content_type = HeaderValue::from_str(&cached.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        headers.insert(CONTENT_TYPE, content_type);
        if let Ok(cache_control) = HeaderValue::from_str(&cached.cache_control) {
            headers.insert(CACHE_CONTROL, cache_control);
        }
        Self {
            status: StatusCode::from_u16(cached.status).unwrap_or(StatusCode::BAD_GATEWAY),
            headers,
            body: cached.body,
        }
    }

    /// Attach CORS headers for an origin that has already been admitted.
    fn with_cors(mut self, origin: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(origin) {
            self.headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
        self.headers.insert(VARY, HeaderValue::from_static("Origin"));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        (self.status, self.headers, self.body).into_response()
    }
}

/// Bookkeeping for the telemetry event of one request.
#[derive(Default)]
struct Trace {
    reason: Option<BlockReason>,
    destination: Option<String>,
    cache: Option<CacheOutcome>,
    tier: Option<CacheTier>,
}

impl Trace {
    fn block(&mut self, reason: BlockReason) {
        self.reason = Some(reason);
    }
}

pub struct RevocationProxy {
    allow: AllowList,
    ttl: TtlConfig,
    cache: EdgeCache,
    upstream: Arc<dyn Upstream>,
    telemetry: Arc<dyn TelemetrySink>,
    metrics: Arc<ProxyMetrics>,
}

impl RevocationProxy {
    pub fn new(
        config: &ProxyConfig,
        upstream: Arc<dyn Upstream>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Result<Self, ProxyError> {
        Ok(Self {
            allow: AllowList::from_config(config)?,
            ttl: config.ttl.clone(),
            cache: EdgeCache::new(config.cache_capacity),
            upstream,
            telemetry,
            metrics: Arc::new(ProxyMetrics::new()?),
        })
    }

    /// Production wiring: `reqwest` upstream, and an HTTP telemetry sink when
    /// an endpoint is configured (`tracing` otherwise).
    pub fn from_config(config: &ProxyConfig) -> Result<Self, ProxyError> {
        let upstream = HttpUpstream::new(
            &config.user_agent,
            config.upstream_timeout_secs.map(Duration::from_secs),
        )?;
        let telemetry: Arc<dyn TelemetrySink> = match &config.telemetry_endpoint {
            Some(endpoint) => Arc::new(HttpTelemetrySink::new(endpoint.clone())?),
            None => Arc::new(TracingSink),
        };
        Self::new(config, Arc::new(upstream), telemetry)
    }

    pub fn metrics(&self) -> &ProxyMetrics {
        &self.metrics
    }

    pub async fn handle(&self, request: ProxyRequest) -> ProxyResponse {
        let started = Instant::now();
        let mut trace = Trace::default();
        let response = self.dispatch(&request, &mut trace).await;

        match trace.reason {
            Some(reason) => self
                .metrics
                .requests_blocked
                .with_label_values(&[reason.as_str()])
                .inc(),
            None => {
                if let Some(tier) = trace.tier {
                    self.metrics
                        .requests_allowed
                        .with_label_values(&[tier.as_str()])
                        .inc();
                }
            }
        }

        self.telemetry.record(ProxyLogEvent {
            timestamp: Utc::now(),
            decision: if trace.reason.is_some() {
                Decision::Blocked
            } else {
                Decision::Allowed
            },
            reason: trace.reason,
            origin: request.origin.clone(),
            destination: trace.destination,
            method: request.method.to_string(),
            status: response.status.as_u16(),
            cache: trace.cache,
            tier: trace.tier,
            duration_ms: started.elapsed().as_millis() as u64,
        });
        response
    }

    async fn dispatch(&self, request: &ProxyRequest, trace: &mut Trace) -> ProxyResponse {
        let origin = match request.origin.as_deref() {
            Some(origin) if self.allow.is_allowed_origin(origin) => origin,
            _ => {
                trace.block(BlockReason::Origin);
                return ProxyResponse::text(StatusCode::FORBIDDEN, "Forbidden");
            }
        };

        if request.method == Method::OPTIONS {
            trace.cache = Some(CacheOutcome::Bypass);
            return preflight(origin);
        }

        if request.method != Method::GET && request.method != Method::POST {
            trace.block(BlockReason::Method);
            return ProxyResponse::text(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
                .with_cors(origin);
        }

        let Some(raw) = request.destination.as_deref().filter(|d| !d.is_empty()) else {
            trace.block(BlockReason::MissingUrl);
            return ProxyResponse::text(StatusCode::BAD_REQUEST, "Missing url parameter")
                .with_cors(origin);
        };

        let url = match self.allow.check_destination(raw) {
            Ok(url) => url,
            Err(rejection) => {
                debug!(destination = raw, %rejection, "destination rejected");
                trace.block(BlockReason::Destination);
                trace.destination = Some(raw.to_string());
                return ProxyResponse::text(StatusCode::BAD_REQUEST, "Destination not allowed")
                    .with_cors(origin);
            }
        };

        let tier = CacheTier::classify(&url);
        trace.destination = Some(url.to_string());
        trace.tier = Some(tier);

        let response = if request.method == Method::POST {
            trace.cache = Some(CacheOutcome::Bypass);
            self.relay_post(request, &url).await
        } else {
            self.relay_get(request, &url, tier, trace).await
        };
        response.with_cors(origin)
    }

    async fn relay_get(
        &self,
        request: &ProxyRequest,
        url: &Url,
        tier: CacheTier,
        trace: &mut Trace,
    ) -> ProxyResponse {
        if let Some(hit) = self.cache.get(&request.cache_key).await {
            self.metrics.cache_hits.inc();
            trace.cache = Some(CacheOutcome::Hit);
            return ProxyResponse::from_cached(hit);
        }
        self.metrics.cache_misses.inc();
        trace.cache = Some(CacheOutcome::Miss);

        let fetched = match self
            .fetch(UpstreamRequest {
                method: Method::GET,
                url: url.to_string(),
                content_type: None,
                body: Bytes::new(),
            })
            .await
        {
            Ok(fetched) => fetched,
            Err(e) => return bad_gateway(&e),
        };

        let ttl = tier.ttl_secs(&self.ttl);
        let status = fetched.status;
        let cached = CachedResponse {
            status: status.as_u16(),
            content_type: fetched
                .content_type
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            cache_control: format!("public, max-age={ttl}"),
            body: fetched.body,
        };
        if status == StatusCode::OK {
            self.cache
                .put(&request.cache_key, cached.clone(), Duration::from_secs(ttl))
                .await;
        }
        ProxyResponse::from_cached(cached)
    }

    async fn relay_post(&self, request: &ProxyRequest, url: &Url) -> ProxyResponse {
        let fetched = match self
            .fetch(UpstreamRequest {
                method: Method::POST,
                url: url.to_string(),
                content_type: request.content_type.clone(),
                body: request.body.clone(),
            })
            .await
        {
            Ok(fetched) => fetched,
            Err(e) => return bad_gateway(&e),
        };

        ProxyResponse::from_cached(CachedResponse {
            status: fetched.status.as_u16(),
            content_type: fetched
                .content_type
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            cache_control: "no-store".to_string(),
            body: fetched.body,
        })
    }

    async fn fetch(&self, request: UpstreamRequest) -> Result<UpstreamResponse, ProxyError> {
        let started = Instant::now();
        let url = request.url.clone();
        let result = self.upstream.fetch(request).await;
        self.metrics
            .upstream_latency_ms
            .observe(started.elapsed().as_secs_f64() * 1000.0);
        if let Err(e) = &result {
            self.metrics.upstream_failures.inc();
            warn!(destination = %url, "upstream fetch failed: {e}");
        }
        result
    }
}

fn preflight(origin: &str) -> ProxyResponse {
    let mut response = ProxyResponse {
        status: StatusCode::OK,
        headers: HeaderMap::new(),
        body: Bytes::new(),
    }
    .with_cors(origin);
    response.headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    response
        .headers
        .insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
    response
        .headers
        .insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from(PREFLIGHT_MAX_AGE_SECS));
    response
}

fn bad_gateway(error: &ProxyError) -> ProxyResponse {
    ProxyResponse::text(StatusCode::BAD_GATEWAY, format!("Proxy error: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_is_percent_encoded() {
        assert_eq!(
            cache_key_for("https://ocsp.sk.ee/"),
            "/?url=https%3A%2F%2Focsp.sk.ee%2F"
        );
        assert_eq!(
            ProxyRequest::get(None, "http://crl.sk.ee/esteid2018.crl?x=1&y=2").cache_key,
            "/?url=http%3A%2F%2Fcrl.sk.ee%2Festeid2018.crl%3Fx%3D1%26y%3D2"
        );
    }
}
