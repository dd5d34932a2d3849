//! Status reconciliation.
//!
//! Pure functions mapping the verifier's verdict, document coverage and the
//! revocation outcome to a UI trust state and explanatory text. Nothing here
//! performs I/O or mutates its inputs; every function returns a new result.

use edoc_types::{
    CryptoStatus, RevocationInfo, SignatureValidationResult, SignerInfo, VerificationResult,
    VerificationStatus,
};

use crate::coverage::{all_documents_signed, unsigned_documents};

pub const UNSIGNED_DOCUMENTS_MESSAGE: &str = "Not all document files are signed";
pub const REVOKED_MESSAGE: &str = "Certificate revoked";

/// UI state after the crypto-only pass.
pub fn quick_status(status: CryptoStatus, all_documents_signed: bool) -> VerificationStatus {
    match status {
        CryptoStatus::Valid if all_documents_signed => VerificationStatus::Pending,
        CryptoStatus::Valid | CryptoStatus::Invalid => VerificationStatus::Failed,
        CryptoStatus::Indeterminate => VerificationStatus::Unknown,
        CryptoStatus::Unsupported => VerificationStatus::Unsupported,
    }
}

/// UI state after the revocation/timestamp pass.
pub fn full_status(status: CryptoStatus, revocation: Option<&RevocationInfo>) -> VerificationStatus {
    match status {
        CryptoStatus::Valid => match revocation {
            Some(r) if r.is_revoked() => VerificationStatus::Failed,
            Some(r) if r.is_good() => VerificationStatus::Verified,
            _ => VerificationStatus::Unknown,
        },
        CryptoStatus::Invalid => VerificationStatus::Failed,
        CryptoStatus::Indeterminate => VerificationStatus::Unknown,
        CryptoStatus::Unsupported => VerificationStatus::Unsupported,
    }
}

/// Explanation taken from the verifier's own output.
///
/// The joined error list wins, unless the status message is longer and so
/// more detailed. Without errors, the status message is used for any
/// non-`VALID` verdict.
pub fn verifier_message(result: &VerificationResult) -> Option<String> {
    let status_message = result.status_message.as_deref().filter(|m| !m.is_empty());

    if !result.errors.is_empty() {
        let joined = result.errors.join("; ");
        return Some(match status_message {
            Some(message) if message.len() > joined.len() => message.to_string(),
            _ => joined,
        });
    }

    match status_message {
        Some(message) if result.status != CryptoStatus::Valid => Some(message.to_string()),
        _ => None,
    }
}

/// Builds the quick-stage result for one signature.
pub fn quick_result(
    signature_index: usize,
    signer_info: SignerInfo,
    signed_files: Vec<String>,
    documents: &[String],
    result: &VerificationResult,
) -> SignatureValidationResult {
    let covered = all_documents_signed(documents, &signed_files);
    let unsigned_files = unsigned_documents(documents, &signed_files);

    let mut error = verifier_message(result);
    if !covered {
        error = Some(match error {
            Some(message) => format!("{message}; {UNSIGNED_DOCUMENTS_MESSAGE}"),
            None => UNSIGNED_DOCUMENTS_MESSAGE.to_string(),
        });
    }

    SignatureValidationResult {
        signer_info,
        valid: result.status == CryptoStatus::Valid && covered,
        error,
        all_documents_signed: covered,
        signed_files,
        unsigned_files,
        original_verification_valid: result.is_valid,
        revocation: None,
        timestamp: None,
        verification_status: quick_status(result.status, covered),
        status_message: result.status_message.clone(),
        limitations: result.limitations.clone(),
        signature_index,
    }
}

/// Quick-stage result for a signature whose verification itself failed.
pub fn quick_failure(
    signature_index: usize,
    documents: &[String],
    message: impl Into<String>,
) -> SignatureValidationResult {
    SignatureValidationResult {
        signer_info: SignerInfo::unknown(),
        valid: false,
        error: Some(message.into()),
        all_documents_signed: all_documents_signed(documents, &[]),
        signed_files: Vec::new(),
        unsigned_files: documents.to_vec(),
        original_verification_valid: false,
        revocation: None,
        timestamp: None,
        verification_status: VerificationStatus::Failed,
        status_message: None,
        limitations: None,
        signature_index,
    }
}

/// Overlays a full verification outcome on the quick result.
///
/// Signer info, coverage and file lists are carried over unchanged.
pub fn overlay_full(
    quick: &SignatureValidationResult,
    result: &VerificationResult,
) -> SignatureValidationResult {
    let revocation = result.revocation().cloned();
    let revoked = revocation.as_ref().is_some_and(RevocationInfo::is_revoked);
    let revocation_good = revocation.as_ref().is_some_and(RevocationInfo::is_good);

    let error = verifier_message(result)
        .or_else(|| revoked.then(|| REVOKED_MESSAGE.to_string()))
        .or_else(|| quick.error.clone());

    SignatureValidationResult {
        valid: result.status == CryptoStatus::Valid && revocation_good && quick.all_documents_signed,
        error,
        verification_status: full_status(result.status, revocation.as_ref()),
        revocation,
        timestamp: result.timestamp.clone(),
        status_message: result
            .status_message
            .clone()
            .filter(|m| !m.is_empty())
            .or_else(|| quick.status_message.clone()),
        limitations: result
            .limitations
            .clone()
            .or_else(|| quick.limitations.clone()),
        ..quick.clone()
    }
}

/// Full-stage result when the verification call itself failed.
///
/// The quick error, if any, is kept in preference to the failure text.
pub fn degrade_full(quick: &SignatureValidationResult, message: &str) -> SignatureValidationResult {
    SignatureValidationResult {
        valid: false,
        verification_status: VerificationStatus::Failed,
        error: quick.error.clone().or_else(|| Some(message.to_string())),
        ..quick.clone()
    }
}
