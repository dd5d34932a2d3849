//! Containers and signatures for tests.

use edoc_types::{CertificateSubject, Container, RawSignature};
use edoc_verification::VerifierHandle;
use std::sync::Arc;

use crate::parser::NullParser;
use crate::verifier::NullVerifier;

/// A signature by "Anna Berzina" covering `references`.
pub fn signature(id: &str, references: &[&str]) -> RawSignature {
    signature_by(
        id,
        references,
        CertificateSubject {
            given_name: Some("Anna".into()),
            surname: Some("Berzina".into()),
            common_name: Some("BERZINA,ANNA,010101-12345".into()),
            serial_number: Some("PNOLV-010101-12345".into()),
        },
    )
}

pub fn signature_by(id: &str, references: &[&str], subject: CertificateSubject) -> RawSignature {
    RawSignature {
        id: id.to_string(),
        signer_info: Some(subject),
        signing_time: Some("2024-03-01T10:15:00Z".into()),
        references: references.iter().map(|r| r.to_string()).collect(),
        payload: format!("<ds:Signature Id=\"{id}\"/>").into_bytes(),
    }
}

/// A container holding `documents` plus one signature file per signature.
pub fn container(documents: &[&str], signatures: Vec<RawSignature>) -> Container {
    let mut container = Container {
        document_file_list: documents.iter().map(|d| d.to_string()).collect(),
        metadata_file_list: vec!["mimetype".into(), "META-INF/manifest.xml".into()],
        ..Container::default()
    };
    for document in documents {
        container
            .files
            .insert(document.to_string(), format!("content of {document}").into_bytes());
    }
    for (index, signature) in signatures.iter().enumerate() {
        let path = format!("META-INF/signatures{index}.xml");
        container.files.insert(path.clone(), signature.payload.clone());
        container.metadata_file_list.push(path);
        for reference in &signature.references {
            if !container.signed_file_list.contains(reference) {
                container.signed_file_list.push(reference.clone());
            }
        }
    }
    container.signatures = signatures;
    container
}

pub fn verifier_handle(parser: Arc<NullParser>, verifier: Arc<NullVerifier>) -> VerifierHandle {
    VerifierHandle::new(parser, verifier)
}
