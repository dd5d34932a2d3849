//! Prometheus metrics for the revocation proxy.

use prometheus::{
    register_histogram_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry, Encoder, Histogram, HistogramOpts, IntCounter,
    IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::error::ProxyError;

pub struct ProxyMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Requests relayed (or served from cache), by cache tier.
    pub requests_allowed: IntCounterVec,
    /// Requests refused, by reason.
    pub requests_blocked: IntCounterVec,
    pub cache_hits: IntCounter,
    pub cache_misses: IntCounter,
    /// Destination fetches that failed outright (502).
    pub upstream_failures: IntCounter,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Destination fetch latency in milliseconds.
    pub upstream_latency_ms: Histogram,
}

impl ProxyMetrics {
    pub fn new() -> Result<Self, ProxyError> {
        let registry = Registry::new();

        let requests_allowed = register_int_counter_vec_with_registry!(
            Opts::new(
                "edoc_proxy_requests_allowed_total",
                "Requests relayed or served from cache"
            ),
            &["tier"],
            registry
        )?;
        let requests_blocked = register_int_counter_vec_with_registry!(
            Opts::new("edoc_proxy_requests_blocked_total", "Requests refused"),
            &["reason"],
            registry
        )?;
        let cache_hits = register_int_counter_with_registry!(
            Opts::new("edoc_proxy_cache_hits_total", "GET requests served from the edge cache"),
            registry
        )?;
        let cache_misses = register_int_counter_with_registry!(
            Opts::new("edoc_proxy_cache_misses_total", "GET requests fetched from the destination"),
            registry
        )?;
        let upstream_failures = register_int_counter_with_registry!(
            Opts::new("edoc_proxy_upstream_failures_total", "Destination fetches that failed"),
            registry
        )?;
        let upstream_latency_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "edoc_proxy_upstream_latency_ms",
                "Destination fetch latency in milliseconds"
            )
            .buckets(prometheus::exponential_buckets(5.0, 2.0, 12)?),
            registry
        )?;

        Ok(Self {
            registry,
            requests_allowed,
            requests_blocked,
            cache_hits,
            cache_misses,
            upstream_failures,
            upstream_latency_ms,
        })
    }

    /// Text exposition format.
    pub fn encode(&self) -> Result<String, ProxyError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| ProxyError::Config(e.to_string()))
    }
}
