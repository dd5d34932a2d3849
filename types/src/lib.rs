//! Fundamental types for eDoc signature verification.
//!
//! This crate defines the data model shared by every other crate in the
//! workspace: the parsed container, the raw signature objects handed out by
//! the container parser, the options and results exchanged with the
//! cryptographic verifier, and the per-signature validation result that the
//! two verification stages produce.

pub mod container;
pub mod result;
pub mod revocation;
pub mod signer;
pub mod status;
pub mod verifier;

pub use container::{Container, FileMap, RawSignature};
pub use result::{SignatureValidationResult, VerificationLimitation};
pub use revocation::{RevocationInfo, RevocationMethod, RevocationStatus, TimestampInfo};
pub use signer::{CertificateSubject, SignerInfo};
pub use status::{CryptoStatus, VerificationStatus};
pub use verifier::{CertificateResult, RevocationOptions, VerificationResult, VerifyOptions};
