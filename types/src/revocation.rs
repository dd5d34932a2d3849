//! Revocation and timestamp outcomes of the Full stage.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevocationStatus {
    Good,
    Revoked,
    Unknown,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevocationMethod {
    Ocsp,
    Crl,
}

/// Revocation status of the signing certificate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationInfo {
    pub status: RevocationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<RevocationMethod>,
}

impl RevocationInfo {
    pub fn is_good(&self) -> bool {
        self.status == RevocationStatus::Good
    }

    pub fn is_revoked(&self) -> bool {
        self.status == RevocationStatus::Revoked
    }
}

/// Signature timestamp token outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampInfo {
    pub time: String,
    pub valid: bool,
}
