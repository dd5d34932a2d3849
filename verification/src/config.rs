//! Verification configuration with TOML file support.

use serde::{Deserialize, Serialize};

use crate::error::VerificationError;

/// Public revocation proxy used by the hosted viewer.
pub const DEFAULT_PROXY_URL: &str = "https://cors-proxy.edocviewer.app/?url=";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Prefix the verifier prepends to every percent-encoded OCSP/CRL URL.
    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,
}

fn default_proxy_url() -> String {
    DEFAULT_PROXY_URL.to_string()
}

impl VerificationConfig {
    pub fn with_proxy_url(proxy_url: impl Into<String>) -> Self {
        Self {
            proxy_url: proxy_url.into(),
        }
    }

    pub fn from_toml_file(path: &str) -> Result<Self, VerificationError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| VerificationError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, VerificationError> {
        toml::from_str(s).map_err(|e| VerificationError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, VerificationError> {
        toml::to_string_pretty(self).map_err(|e| VerificationError::Config(e.to_string()))
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            proxy_url: default_proxy_url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_uses_default_proxy() {
        let config = VerificationConfig::from_toml_str("").unwrap();
        assert_eq!(config.proxy_url, DEFAULT_PROXY_URL);
    }

    #[test]
    fn proxy_url_override() {
        let config =
            VerificationConfig::from_toml_str(r#"proxy_url = "http://localhost:8787/?url=""#)
                .unwrap();
        assert_eq!(config.proxy_url, "http://localhost:8787/?url=");
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"proxy_url = "https://proxy.internal/?url=""#).unwrap();
        let config = VerificationConfig::from_toml_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.proxy_url, "https://proxy.internal/?url=");
    }

    #[test]
    fn round_trips_through_toml() {
        let config = VerificationConfig::with_proxy_url("https://p.example/?url=");
        let text = config.to_toml_string().unwrap();
        assert_eq!(VerificationConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = VerificationConfig::from_toml_file("/nonexistent/edoc.toml").unwrap_err();
        assert!(matches!(err, VerificationError::Config(_)));
    }
}
