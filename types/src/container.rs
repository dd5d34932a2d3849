//! Parsed ASiC-E / eDoc container.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::signer::CertificateSubject;

/// Archive-relative path to raw file bytes. Keys are unique.
pub type FileMap = BTreeMap<String, Vec<u8>>;

/// A container as produced by the container parser.
///
/// Immutable after creation. A viewing session owns exactly one container and
/// drops it when the user selects another file or goes back.
#[derive(Clone, Debug, Default)]
pub struct Container {
    /// Every file in the archive.
    pub files: FileMap,
    /// Paths classified as end-user documents, in archive order.
    pub document_file_list: Vec<String>,
    /// Paths classified as container metadata (manifest, signatures).
    pub metadata_file_list: Vec<String>,
    /// Paths referenced by at least one signature.
    pub signed_file_list: Vec<String>,
    /// Signatures in the order the parser found them.
    pub signatures: Vec<RawSignature>,
}

impl Container {
    /// Number of signatures in the container.
    pub fn signature_count(&self) -> usize {
        self.signatures.len()
    }

    /// Look up a signature by index.
    pub fn signature(&self, index: usize) -> Option<&RawSignature> {
        self.signatures.get(index)
    }
}

/// A signature object as handed out by the container parser.
///
/// The orchestrator only reads the display fields and the file references;
/// `payload` is opaque and passed back to the verifier untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSignature {
    /// Signature element identifier inside the container.
    #[serde(default)]
    pub id: String,
    /// Subject fields of the signing certificate, if the parser found one.
    #[serde(default)]
    pub signer_info: Option<CertificateSubject>,
    /// Claimed signing time as written in the signature.
    #[serde(default)]
    pub signing_time: Option<String>,
    /// Archive paths covered by this signature.
    #[serde(default)]
    pub references: Vec<String>,
    /// Raw signature document.
    #[serde(default, skip_serializing)]
    pub payload: Vec<u8>,
}
