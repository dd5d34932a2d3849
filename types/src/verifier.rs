//! Options and results exchanged with the cryptographic verifier.

use serde::{Deserialize, Serialize};

use crate::result::VerificationLimitation;
use crate::revocation::{RevocationInfo, TimestampInfo};
use crate::status::CryptoStatus;

/// Where the verifier should route OCSP/CRL fetches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevocationOptions {
    /// Prefix to which the percent-encoded destination URL is appended.
    pub proxy_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOptions {
    pub check_revocation: bool,
    pub verify_timestamps: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_options: Option<RevocationOptions>,
}

impl VerifyOptions {
    /// Crypto-only verification. Performs no network I/O.
    pub fn quick() -> Self {
        Self {
            check_revocation: false,
            verify_timestamps: false,
            revocation_options: None,
        }
    }

    /// Revocation and timestamp checks routed through `proxy_url`.
    pub fn full(proxy_url: impl Into<String>) -> Self {
        Self {
            check_revocation: true,
            verify_timestamps: true,
            revocation_options: Some(RevocationOptions {
                proxy_url: proxy_url.into(),
            }),
        }
    }

    pub fn is_offline(&self) -> bool {
        !self.check_revocation && !self.verify_timestamps
    }
}

/// Certificate-level part of a verification result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateResult {
    #[serde(default)]
    pub revocation: Option<RevocationInfo>,
}

/// What the verifier reports for one signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub is_valid: bool,
    pub status: CryptoStatus,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub limitations: Option<Vec<VerificationLimitation>>,
    #[serde(default)]
    pub certificate: CertificateResult,
    #[serde(default)]
    pub timestamp: Option<TimestampInfo>,
}

impl VerificationResult {
    /// A result with the given status and no errors or sub-results.
    pub fn with_status(status: CryptoStatus) -> Self {
        Self {
            is_valid: status == CryptoStatus::Valid,
            status,
            errors: Vec::new(),
            status_message: None,
            limitations: None,
            certificate: CertificateResult::default(),
            timestamp: None,
        }
    }

    pub fn revocation(&self) -> Option<&RevocationInfo> {
        self.certificate.revocation.as_ref()
    }
}
