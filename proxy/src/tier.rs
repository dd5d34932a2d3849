//! Destination tiers and their cache lifetimes.

use reqwest::Url;
use serde::Serialize;

use crate::config::TtlConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheTier {
    /// OCSP responses: short-lived, minutes.
    Ocsp,
    /// Certificate revocation lists: hours.
    Crl,
    /// Issuer certificates: effectively immutable, a day.
    CaCertificate,
    Default,
}

impl CacheTier {
    /// Classify a normalised destination URL.
    ///
    /// File extensions win over host names, so a `.crl` on an OCSP host is
    /// still cached as a CRL.
    pub fn classify(url: &Url) -> Self {
        let path = url.path().to_ascii_lowercase();
        if path.ends_with(".crl") {
            return Self::Crl;
        }
        if [".crt", ".cer", ".der"].iter().any(|ext| path.ends_with(ext)) {
            return Self::CaCertificate;
        }

        let first_label = url
            .host_str()
            .and_then(|host| host.split('.').next())
            .unwrap_or_default();
        if first_label.starts_with("ocsp") || path.split('/').any(|segment| segment == "ocsp") {
            return Self::Ocsp;
        }
        if first_label == "aia" {
            return Self::CaCertificate;
        }
        Self::Default
    }

    pub fn ttl_secs(&self, ttl: &TtlConfig) -> u64 {
        match self {
            Self::Ocsp => ttl.ocsp_secs,
            Self::Crl => ttl.crl_secs,
            Self::CaCertificate => ttl.ca_certificate_secs,
            Self::Default => ttl.default_secs,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ocsp => "ocsp",
            Self::Crl => "crl",
            Self::CaCertificate => "ca_certificate",
            Self::Default => "default",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(url: &str) -> CacheTier {
        CacheTier::classify(&Url::parse(url).unwrap())
    }

    #[test]
    fn classifies_by_extension_then_host() {
        assert_eq!(tier("http://ocsp.sk.ee/"), CacheTier::Ocsp);
        assert_eq!(tier("http://ocsp2.example-ca.com/status"), CacheTier::Ocsp);
        assert_eq!(tier("https://www.eparaksts.lv/ocsp"), CacheTier::Ocsp);
        assert_eq!(tier("http://c.sk.ee/esteid2018.crl"), CacheTier::Crl);
        assert_eq!(tier("http://crl3.digicert.com/Root.CRL"), CacheTier::Crl);
        assert_eq!(tier("http://aia.sk.ee/esteid2018.der.crt"), CacheTier::CaCertificate);
        assert_eq!(tier("http://aia.example-ca.com/issuer"), CacheTier::CaCertificate);
        assert_eq!(tier("https://ca.diia.gov.ua/download/root.cer"), CacheTier::CaCertificate);
        assert_eq!(tier("https://ca.diia.gov.ua/"), CacheTier::Default);
    }

    #[test]
    fn ttl_per_tier() {
        let ttl = TtlConfig::default();
        assert_eq!(CacheTier::Ocsp.ttl_secs(&ttl), 600);
        assert_eq!(CacheTier::Crl.ttl_secs(&ttl), 6 * 3600);
        assert_eq!(CacheTier::CaCertificate.ttl_secs(&ttl), 24 * 3600);
        assert_eq!(CacheTier::Default.ttl_secs(&ttl), 3600);
    }
}
