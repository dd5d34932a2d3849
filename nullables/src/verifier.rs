//! Nullable signature verifier — scripted verdicts per signature id.
//!
//! Unscripted signatures verify as `VALID` in both stages, with a good OCSP
//! revocation status in the full stage.

use edoc_types::{
    CryptoStatus, FileMap, RawSignature, RevocationInfo, RevocationMethod, RevocationStatus,
    VerificationResult, VerifyOptions,
};
use edoc_verification::{SignatureVerifier, VerifierError};
use futures_util::future::BoxFuture;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// One recorded `verify_signature` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyCall {
    pub signature_id: String,
    pub options: VerifyOptions,
}

impl VerifyCall {
    pub fn is_full(&self) -> bool {
        !self.options.is_offline()
    }
}

type Scripted = HashMap<String, Result<VerificationResult, String>>;

#[derive(Default)]
pub struct NullVerifier {
    quick: Scripted,
    full: Scripted,
    quick_panics: HashSet<String>,
    full_panics: HashSet<String>,
    full_gate: Option<Arc<Semaphore>>,
    calls: Mutex<Vec<VerifyCall>>,
}

impl NullVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quick(mut self, signature_id: &str, result: VerificationResult) -> Self {
        self.quick.insert(signature_id.to_string(), Ok(result));
        self
    }

    pub fn with_full(mut self, signature_id: &str, result: VerificationResult) -> Self {
        self.full.insert(signature_id.to_string(), Ok(result));
        self
    }

    /// The quick call for `signature_id` errors with `message`.
    pub fn fail_quick(mut self, signature_id: &str, message: &str) -> Self {
        self.quick
            .insert(signature_id.to_string(), Err(message.to_string()));
        self
    }

    /// The full call for `signature_id` errors as a network failure.
    pub fn fail_full(mut self, signature_id: &str, message: &str) -> Self {
        self.full
            .insert(signature_id.to_string(), Err(message.to_string()));
        self
    }

    /// The quick call for `signature_id` panics instead of answering.
    pub fn panic_quick(mut self, signature_id: &str) -> Self {
        self.quick_panics.insert(signature_id.to_string());
        self
    }

    pub fn panic_full(mut self, signature_id: &str) -> Self {
        self.full_panics.insert(signature_id.to_string());
        self
    }

    /// Full calls wait for a permit on `gate` before answering. Start the
    /// gate with zero permits and add them to release waiting calls.
    pub fn gate_full(mut self, gate: Arc<Semaphore>) -> Self {
        self.full_gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<VerifyCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn full_calls(&self) -> Vec<VerifyCall> {
        self.calls().into_iter().filter(VerifyCall::is_full).collect()
    }

    pub fn quick_calls(&self) -> Vec<VerifyCall> {
        self.calls().into_iter().filter(|c| !c.is_full()).collect()
    }
}

/// A full-stage verdict with the given crypto status and revocation outcome.
pub fn full_result(status: CryptoStatus, revocation: Option<RevocationStatus>) -> VerificationResult {
    let mut result = VerificationResult::with_status(status);
    result.certificate.revocation = revocation.map(|status| RevocationInfo {
        status,
        method: Some(RevocationMethod::Ocsp),
    });
    result
}

impl SignatureVerifier for NullVerifier {
    fn verify_signature<'a>(
        &'a self,
        signature: &'a RawSignature,
        _files: &'a FileMap,
        options: &'a VerifyOptions,
    ) -> BoxFuture<'a, Result<VerificationResult, VerifierError>> {
        self.calls.lock().unwrap().push(VerifyCall {
            signature_id: signature.id.clone(),
            options: options.clone(),
        });

        let is_full = !options.is_offline();
        let panics = if is_full { &self.full_panics } else { &self.quick_panics };
        if panics.contains(&signature.id) {
            panic!("verifier crashed on {}", signature.id);
        }

        let outcome = if is_full {
            match self.full.get(&signature.id).cloned() {
                Some(Ok(result)) => Ok(result),
                Some(Err(message)) => Err(VerifierError::Network(message)),
                None => Ok(full_result(CryptoStatus::Valid, Some(RevocationStatus::Good))),
            }
        } else {
            match self.quick.get(&signature.id).cloned() {
                Some(Ok(result)) => Ok(result),
                Some(Err(message)) => Err(VerifierError::Other(message)),
                None => Ok(VerificationResult::with_status(CryptoStatus::Valid)),
            }
        };

        let gate = if is_full { self.full_gate.clone() } else { None };
        Box::pin(async move {
            if let Some(gate) = gate {
                let _permit = gate.acquire().await;
            }
            outcome
        })
    }
}
