//! Per-signature validation result.

use serde::{Deserialize, Serialize};

use crate::revocation::{RevocationInfo, TimestampInfo};
use crate::signer::SignerInfo;
use crate::status::VerificationStatus;

/// Platform or environment limitation reported by the verifier.
///
/// Informational only; never changes the status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationLimitation {
    pub code: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

/// Validation result for one signature, correlated by `signature_index`.
///
/// The Quick stage creates it; the Full stage returns a new value with the
/// network-dependent fields overlaid and everything else carried over.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureValidationResult {
    pub signer_info: SignerInfo,
    /// Final trust verdict.
    pub valid: bool,
    pub error: Option<String>,
    pub all_documents_signed: bool,
    pub signed_files: Vec<String>,
    pub unsigned_files: Vec<String>,
    /// Raw cryptographic verdict, independent of document coverage.
    pub original_verification_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation: Option<RevocationInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<TimestampInfo>,
    pub verification_status: VerificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limitations: Option<Vec<VerificationLimitation>>,
    pub signature_index: usize,
}

impl SignatureValidationResult {
    /// Whether the Full stage would be skipped for this result.
    pub fn is_terminal(&self) -> bool {
        self.verification_status.is_terminal()
    }
}
