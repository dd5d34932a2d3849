//! Seams to the external container parser and signature verifier.

use edoc_types::{Container, FileMap, RawSignature, VerificationResult, VerifyOptions};
use futures_util::future::BoxFuture;
use std::sync::Arc;

use crate::error::VerifierError;

/// Parses raw ASiC-E / eDoc bytes.
pub trait ContainerParser: Send + Sync {
    /// Fails with a descriptive error on malformed input; never returns a
    /// partial container.
    fn parse_container(&self, bytes: &[u8]) -> Result<Container, VerifierError>;
}

/// Verifies one XAdES signature against the container's files.
///
/// With [`VerifyOptions::quick`] the call must not touch the network. With
/// [`VerifyOptions::full`] it fetches OCSP/CRL data through the configured
/// proxy and may be slow or fail for reasons unrelated to the signature.
pub trait SignatureVerifier: Send + Sync {
    fn verify_signature<'a>(
        &'a self,
        signature: &'a RawSignature,
        files: &'a FileMap,
        options: &'a VerifyOptions,
    ) -> BoxFuture<'a, Result<VerificationResult, VerifierError>>;
}

/// A loaded verifier library: parser plus signature verifier.
#[derive(Clone)]
pub struct VerifierHandle {
    parser: Arc<dyn ContainerParser>,
    verifier: Arc<dyn SignatureVerifier>,
}

impl VerifierHandle {
    pub fn new(parser: Arc<dyn ContainerParser>, verifier: Arc<dyn SignatureVerifier>) -> Self {
        Self { parser, verifier }
    }

    pub fn parser(&self) -> &dyn ContainerParser {
        self.parser.as_ref()
    }

    pub fn verifier(&self) -> &dyn SignatureVerifier {
        self.verifier.as_ref()
    }
}

impl std::fmt::Debug for VerifierHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifierHandle").finish_non_exhaustive()
    }
}
