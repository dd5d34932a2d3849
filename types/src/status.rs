//! Status enums for the verifier and the UI trust state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict reported by the cryptographic verifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CryptoStatus {
    Valid,
    Invalid,
    Indeterminate,
    Unsupported,
}

impl CryptoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::Invalid => "INVALID",
            Self::Indeterminate => "INDETERMINATE",
            Self::Unsupported => "UNSUPPORTED",
        }
    }
}

impl fmt::Display for CryptoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trust state of a signature as displayed to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Cryptographically valid; revocation and timestamp checks outstanding.
    Pending,
    /// Valid signature, all documents covered, certificate not revoked.
    Verified,
    /// Invalid, revoked, incomplete coverage, or verification crashed.
    Failed,
    /// Trust could not be established (indeterminate or revocation unknown).
    Unknown,
    /// The signature uses features this platform cannot verify.
    Unsupported,
}

impl VerificationStatus {
    /// Terminal states skip the Full stage.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::Unsupported)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
