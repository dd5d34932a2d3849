//! Origin and destination allow-lists.
//!
//! Two independent trust boundaries:
//! - **Origin**: browsers set the `Origin` header themselves, so a page on
//!   another site cannot pose as the viewer.
//! - **Destination**: even an allowed caller can only reach certificate
//!   infrastructure.

use regex::Regex;
use reqwest::Url;
use std::fmt;

use crate::config::ProxyConfig;
use crate::error::ProxyError;

/// Why a destination was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DestinationRejection {
    /// Not an absolute URL.
    Invalid,
    /// Scheme other than http or https.
    Scheme,
    /// Userinfo in the authority.
    Credentials,
    /// No destination pattern matched.
    NotAllowed,
}

impl fmt::Display for DestinationRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Invalid => "invalid url",
            Self::Scheme => "unsupported scheme",
            Self::Credentials => "credentials in url",
            Self::NotAllowed => "destination not allowed",
        })
    }
}

#[derive(Debug)]
pub struct AllowList {
    origins: Vec<String>,
    preview_origin: Option<Regex>,
    destinations: Vec<Regex>,
}

impl AllowList {
    pub fn new(
        origins: Vec<String>,
        preview_origin_pattern: Option<&str>,
        destination_patterns: &[String],
    ) -> Result<Self, ProxyError> {
        let preview_origin = preview_origin_pattern.map(compile).transpose()?;
        let destinations = destination_patterns
            .iter()
            .map(|p| compile(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            origins,
            preview_origin,
            destinations,
        })
    }

    pub fn from_config(config: &ProxyConfig) -> Result<Self, ProxyError> {
        Self::new(
            config.allowed_origins.clone(),
            config.preview_origin_pattern.as_deref(),
            &config.destination_patterns,
        )
    }

    pub fn is_allowed_origin(&self, origin: &str) -> bool {
        if self.origins.iter().any(|o| o == origin) {
            return true;
        }
        self.preview_origin
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(origin))
    }

    /// Parse and normalise `raw`, then match it against the destination
    /// patterns. The returned URL is what should be fetched.
    pub fn check_destination(&self, raw: &str) -> Result<Url, DestinationRejection> {
        let url = Url::parse(raw).map_err(|_| DestinationRejection::Invalid)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DestinationRejection::Scheme);
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(DestinationRejection::Credentials);
        }
        if self.destinations.iter().any(|p| p.is_match(url.as_str())) {
            Ok(url)
        } else {
            Err(DestinationRejection::NotAllowed)
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, ProxyError> {
    Regex::new(pattern).map_err(|source| ProxyError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> AllowList {
        AllowList::from_config(&ProxyConfig::default()).expect("default patterns compile")
    }

    #[test]
    fn production_and_dev_origins() {
        let allow = defaults();
        assert!(allow.is_allowed_origin("https://edocviewer.app"));
        assert!(allow.is_allowed_origin("https://www.edocviewer.app"));
        assert!(allow.is_allowed_origin("http://localhost:8080"));
        assert!(!allow.is_allowed_origin("http://localhost:3000"));
        assert!(!allow.is_allowed_origin("https://evil.example"));
        assert!(!allow.is_allowed_origin("https://edocviewer.app.evil.example"));
        assert!(!allow.is_allowed_origin(""));
    }

    #[test]
    fn preview_origins() {
        let allow = defaults();
        assert!(allow.is_allowed_origin("https://3f2a9c1b.edocviewer.pages.dev"));
        assert!(!allow.is_allowed_origin("http://3f2a9c1b.edocviewer.pages.dev"));
        assert!(!allow.is_allowed_origin("https://a.b.edocviewer.pages.dev"));
        assert!(!allow.is_allowed_origin("https://x.edocviewer.pages.dev.evil.example"));
    }

    #[test]
    fn previews_can_be_disabled() {
        let allow = AllowList::new(vec!["https://edocviewer.app".into()], None, &[]).unwrap();
        assert!(!allow.is_allowed_origin("https://3f2a9c1b.edocviewer.pages.dev"));
    }

    #[test]
    fn national_pki_destinations() {
        let allow = defaults();
        for url in [
            "http://ocsp.eparaksts.lv/",
            "https://www.eparaksts.lv/files/ocsp/certs/eParaksts_CA_2017.crt",
            "http://aia.sk.ee/esteid2018.der.crt",
            "http://c.sk.ee/esteid2018.crl",
            "http://ocsp.sk.ee/",
            "https://ca.diia.gov.ua/download/certificates/cert.cer",
        ] {
            assert!(allow.check_destination(url).is_ok(), "{url} should be allowed");
        }
    }

    #[test]
    fn generic_destinations() {
        let allow = defaults();
        for url in [
            "http://ocsp.digicert.com/",
            "http://ocsp2.example-ca.com/status",
            "http://aia.example-ca.com/ca.p7c",
            "http://crl3.digicert.com/DigiCertGlobalRootCA.crl",
            "http://cacerts.digicert.com/DigiCertGlobalRootCA.CRT",
            "http://pki.example-ca.com/root.der?v=2",
        ] {
            assert!(allow.check_destination(url).is_ok(), "{url} should be allowed");
        }
    }

    #[test]
    fn rejects_arbitrary_hosts() {
        let allow = defaults();
        for url in [
            "https://evil.example/cert.crt",
            "https://evil.example/",
            "https://desk.ee/",
            "https://evil.example/?u=http://ocsp.sk.ee/",
            "https://evil.example?.sk.ee/",
            "https://evil.example#.sk.ee/",
            "https://sk.ee.evil.example/",
        ] {
            assert_eq!(
                allow.check_destination(url).unwrap_err(),
                DestinationRejection::NotAllowed,
                "{url} should be refused"
            );
        }
    }

    #[test]
    fn rejects_credentials_schemes_and_garbage() {
        let allow = defaults();
        assert_eq!(
            allow.check_destination("https://ocsp.sk.ee@evil.example/").unwrap_err(),
            DestinationRejection::Credentials
        );
        assert_eq!(
            allow.check_destination("https://user:pw@ocsp.sk.ee/").unwrap_err(),
            DestinationRejection::Credentials
        );
        assert_eq!(
            allow.check_destination("ftp://ocsp.sk.ee/").unwrap_err(),
            DestinationRejection::Scheme
        );
        assert_eq!(
            allow.check_destination("not a url").unwrap_err(),
            DestinationRejection::Invalid
        );
    }

    #[test]
    fn normalises_host_case() {
        let allow = defaults();
        let url = allow.check_destination("HTTP://OCSP.SK.EE").unwrap();
        assert_eq!(url.as_str(), "http://ocsp.sk.ee/");
    }

    #[test]
    fn bad_pattern_is_reported() {
        let err = AllowList::new(vec![], None, &["(unclosed".to_string()]).unwrap_err();
        assert!(matches!(err, ProxyError::Pattern { .. }));
    }
}
