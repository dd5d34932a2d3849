//! Best-effort request logging.
//!
//! Every allowed or blocked request produces one [`ProxyLogEvent`]. Sinks must
//! not block and must not fail the request: delivery problems are swallowed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::ProxyError;
use crate::tier::CacheTier;

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Allowed,
    Blocked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    Origin,
    Method,
    MissingUrl,
    Destination,
}

impl BlockReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Method => "method",
            Self::MissingUrl => "missing_url",
            Self::Destination => "destination",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheOutcome {
    Hit,
    Miss,
    /// POST and preflight requests never touch the cache.
    Bypass,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProxyLogEvent {
    pub timestamp: DateTime<Utc>,
    pub decision: Decision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<BlockReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    pub method: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<CacheTier>,
    pub duration_ms: u64,
}

pub trait TelemetrySink: Send + Sync {
    fn record(&self, event: ProxyLogEvent);
}

/// Logs events through `tracing`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn record(&self, event: ProxyLogEvent) {
        info!(
            decision = ?event.decision,
            reason = event.reason.map(|r| r.as_str()),
            origin = event.origin.as_deref(),
            destination = event.destination.as_deref(),
            method = %event.method,
            status = event.status,
            cache = ?event.cache,
            duration_ms = event.duration_ms,
            "proxy request"
        );
    }
}

/// Posts each event as JSON to an external collector from a detached task.
pub struct HttpTelemetrySink {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpTelemetrySink {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ProxyError> {
        let http_client = reqwest::Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()
            .map_err(|e| ProxyError::Config(format!("failed to build telemetry client: {e}")))?;
        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }
}

impl TelemetrySink for HttpTelemetrySink {
    fn record(&self, event: ProxyLogEvent) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("no runtime available, dropping telemetry event");
            return;
        };
        let client = self.http_client.clone();
        let endpoint = self.endpoint.clone();
        runtime.spawn(async move {
            if let Err(e) = client.post(&endpoint).json(&event).send().await {
                debug!("telemetry delivery failed: {e}");
            }
        });
    }
}
