//! Proxy configuration with TOML file support.
//!
//! Every field has a default, so an empty file yields the production
//! configuration of the hosted viewer.

use serde::{Deserialize, Serialize};

use crate::error::ProxyError;

/// Viewer deployments allowed to use the proxy.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://edocviewer.app",
    "https://www.edocviewer.app",
    "http://localhost:8080",
];

/// Preview deployments (`<hash>.edocviewer.pages.dev`).
pub const DEFAULT_PREVIEW_ORIGIN_PATTERN: &str = r"^https://[a-z0-9]+\.edocviewer\.pages\.dev$";

/// Certificate-infrastructure destinations. Matched against the normalised
/// destination URL, whose authority never contains credentials.
pub const DEFAULT_DESTINATION_PATTERNS: &[&str] = &[
    // Latvian eParaksts (LVRTC): CA repository and OCSP responder
    r"^https?://([a-z0-9-]+\.)*eparaksts\.lv(:\d+)?/",
    // Estonian SK ID Solutions: CA, AIA, CRL and OCSP hosts
    r"^https?://([a-z0-9-]+\.)*sk\.ee(:\d+)?/",
    // Ukrainian Diia CA
    r"^https?://ca\.diia\.gov\.ua(:\d+)?/",
    // OCSP responders
    r"^https?://ocsp[a-z0-9-]*(\.[a-z0-9-]+)+(:\d+)?/",
    // Authority Information Access endpoints
    r"^https?://aia(\.[a-z0-9-]+)+(:\d+)?/",
    // CRL and certificate files on certificate-distribution hosts
    r"(?i)^https?://(crls?|certs?|cacerts?|ca|pki)[0-9]*(\.[a-z0-9-]+)+(:\d+)?/[^?#]*\.(crl|crt|cer|der)([?#].*)?$",
];

/// `Cache-Control` max-age per destination tier, in seconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtlConfig {
    #[serde(default = "default_ocsp_ttl")]
    pub ocsp_secs: u64,
    #[serde(default = "default_crl_ttl")]
    pub crl_secs: u64,
    #[serde(default = "default_ca_certificate_ttl")]
    pub ca_certificate_secs: u64,
    #[serde(default = "default_ttl")]
    pub default_secs: u64,
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            ocsp_secs: default_ocsp_ttl(),
            crl_secs: default_crl_ttl(),
            ca_certificate_secs: default_ca_certificate_ttl(),
            default_secs: default_ttl(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Exact origins allowed to call the proxy.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Regex for preview-deployment origins. `None` disables previews.
    #[serde(default = "default_preview_origin_pattern")]
    pub preview_origin_pattern: Option<String>,

    /// Regexes a destination URL must match one of.
    #[serde(default = "default_destination_patterns")]
    pub destination_patterns: Vec<String>,

    /// Maximum number of cached GET responses.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Upstream request timeout. `None` relies on the HTTP client default.
    #[serde(default)]
    pub upstream_timeout_secs: Option<u64>,

    /// `User-Agent` sent to destinations.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Endpoint receiving JSON request logs. `None` logs via tracing only.
    #[serde(default)]
    pub telemetry_endpoint: Option<String>,

    /// Serve Prometheus metrics at `/metrics`.
    #[serde(default)]
    pub enable_metrics: bool,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub ttl: TtlConfig,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_bind() -> String {
    "127.0.0.1:8787".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect()
}

fn default_preview_origin_pattern() -> Option<String> {
    Some(DEFAULT_PREVIEW_ORIGIN_PATTERN.to_string())
}

fn default_destination_patterns() -> Vec<String> {
    DEFAULT_DESTINATION_PATTERNS.iter().map(|s| s.to_string()).collect()
}

fn default_cache_capacity() -> usize {
    1024
}

fn default_user_agent() -> String {
    "edocviewer-cors-proxy/1.0".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ocsp_ttl() -> u64 {
    600
}

fn default_crl_ttl() -> u64 {
    6 * 3600
}

fn default_ca_certificate_ttl() -> u64 {
    24 * 3600
}

fn default_ttl() -> u64 {
    3600
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ProxyConfig {
    pub fn from_toml_file(path: &str) -> Result<Self, ProxyError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ProxyError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ProxyError> {
        toml::from_str(s).map_err(|e| ProxyError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, ProxyError> {
        toml::to_string_pretty(self).map_err(|e| ProxyError::Config(e.to_string()))
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            allowed_origins: default_allowed_origins(),
            preview_origin_pattern: default_preview_origin_pattern(),
            destination_patterns: default_destination_patterns(),
            cache_capacity: default_cache_capacity(),
            upstream_timeout_secs: None,
            user_agent: default_user_agent(),
            telemetry_endpoint: None,
            enable_metrics: false,
            log_format: default_log_format(),
            log_level: default_log_level(),
            ttl: TtlConfig::default(),
        }
    }
}
