//! Revocation proxy.
//!
//! Relays GET/POST requests for OCSP responses, CRLs and CA certificates from
//! the browser-run verifier to certificate-infrastructure servers, which do
//! not send CORS headers. Two independent allow-lists keep it from being an
//! open relay:
//! - the caller's `Origin` must be a known viewer deployment;
//! - the destination must match a known certificate-infrastructure pattern.
//!
//! GET responses are cached at the edge with a TTL chosen by destination
//! type; POST (OCSP requests with a body) is never cached.

pub mod allowlist;
pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod server;
pub mod service;
pub mod shutdown;
pub mod telemetry;
pub mod tier;
pub mod upstream;

pub use allowlist::{AllowList, DestinationRejection};
pub use cache::{CachedResponse, EdgeCache};
pub use config::{ProxyConfig, TtlConfig};
pub use error::ProxyError;
pub use metrics::ProxyMetrics;
pub use server::{router, ProxyServer};
pub use service::{cache_key_for, ProxyRequest, ProxyResponse, RevocationProxy};
pub use shutdown::ShutdownController;
pub use telemetry::{
    BlockReason, CacheOutcome, Decision, HttpTelemetrySink, ProxyLogEvent, TelemetrySink,
    TracingSink,
};
pub use tier::CacheTier;
pub use upstream::{HttpUpstream, Upstream, UpstreamRequest, UpstreamResponse};
