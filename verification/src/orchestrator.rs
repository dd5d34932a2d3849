//! Verification orchestrator: container parsing, the Quick stage and the
//! Full stage.
//!
//! Every method only returns values. Nothing here holds per-run state, so a
//! caller that starts a new run can drop an older run's futures or ignore
//! their output without further cleanup.

use edoc_types::{
    Container, FileMap, RawSignature, SignatureValidationResult, VerificationResult,
    VerifyOptions,
};
use futures_util::future::join_all;
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::collaborator::SignatureVerifier;
use crate::config::VerificationConfig;
use crate::error::{VerificationError, VerifierError};
use crate::loader::VerifierLoader;
use crate::reconcile;
use crate::signer::extract_signer_info;

pub struct EdocVerifier {
    loader: Arc<VerifierLoader>,
    config: VerificationConfig,
}

impl EdocVerifier {
    pub fn new(loader: Arc<VerifierLoader>, config: VerificationConfig) -> Self {
        Self { loader, config }
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    /// Parse raw container bytes. Any failure is fatal for the file.
    pub async fn parse_container(&self, bytes: &[u8]) -> Result<Container, VerificationError> {
        let handle = self
            .loader
            .ensure_loaded()
            .await
            .map_err(|e| VerificationError::Parse(e.to_string()))?;

        let container = handle.parser().parse_container(bytes).map_err(|e| {
            error!("error parsing eDoc file: {e}");
            VerificationError::Parse(e.to_string())
        })?;

        debug!(
            documents = container.document_file_list.len(),
            signatures = container.signatures.len(),
            "parsed container"
        );
        Ok(container)
    }

    /// Crypto-only verification of every signature, concurrently.
    ///
    /// The returned vector has one entry per signature, in signature order.
    /// Only an unavailable verifier fails the whole call; per-signature
    /// failures become `failed` entries.
    pub async fn verify_quick(
        &self,
        container: &Container,
    ) -> Result<Vec<SignatureValidationResult>, VerificationError> {
        let handle = self.loader.ensure_loaded().await.map_err(|e| {
            error!("error verifying signatures: {e}");
            VerificationError::Unavailable(e.to_string())
        })?;

        let options = VerifyOptions::quick();
        let checks = container
            .signatures
            .iter()
            .enumerate()
            .map(|(index, signature)| {
                quick_one(handle.verifier(), container, index, signature, &options)
            });

        Ok(join_all(checks).await)
    }

    /// Revocation and timestamp verification of one signature.
    ///
    /// Terminal quick results (`failed`, `unsupported`) are returned as-is
    /// without calling the verifier. Any failure of the call degrades the
    /// result to `failed`; this never errors.
    pub async fn verify_full(
        &self,
        container: &Container,
        signature_index: usize,
        quick: &SignatureValidationResult,
    ) -> SignatureValidationResult {
        if quick.is_terminal() {
            return quick.clone();
        }

        match self.run_full(container, signature_index).await {
            Ok(result) => {
                let full = reconcile::overlay_full(quick, &result);
                debug!(
                    signature_index,
                    status = %full.verification_status,
                    "full verification finished"
                );
                full
            }
            Err(e) => {
                warn!(signature_index, "error in full signature verification: {e}");
                reconcile::degrade_full(quick, &e.to_string())
            }
        }
    }

    async fn run_full(
        &self,
        container: &Container,
        signature_index: usize,
    ) -> Result<VerificationResult, VerifierError> {
        let handle = self.loader.ensure_loaded().await?;
        let signature = container
            .signature(signature_index)
            .ok_or(VerifierError::SignatureNotFound(signature_index))?;
        let options = VerifyOptions::full(self.config.proxy_url.as_str());
        guarded(handle.verifier(), signature, &container.files, &options).await
    }
}

async fn quick_one(
    verifier: &dyn SignatureVerifier,
    container: &Container,
    index: usize,
    signature: &RawSignature,
    options: &VerifyOptions,
) -> SignatureValidationResult {
    match guarded(verifier, signature, &container.files, options).await {
        Ok(result) => reconcile::quick_result(
            index,
            extract_signer_info(signature),
            signature.references.clone(),
            &container.document_file_list,
            &result,
        ),
        Err(e) => {
            warn!(signature_index = index, "error verifying signature: {e}");
            reconcile::quick_failure(index, &container.document_file_list, e.to_string())
        }
    }
}

/// One collaborator call. A panic inside the verifier is confined to the
/// signature being checked.
async fn guarded(
    verifier: &dyn SignatureVerifier,
    signature: &RawSignature,
    files: &FileMap,
    options: &VerifyOptions,
) -> Result<VerificationResult, VerifierError> {
    AssertUnwindSafe(async move { verifier.verify_signature(signature, files, options).await })
        .catch_unwind()
        .await
        .unwrap_or(Err(VerifierError::Panicked))
}
