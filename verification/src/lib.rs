//! Two-phase signature verification for ASiC-E / eDoc containers.
//!
//! 1. **Quick stage**: every signature is checked cryptographically, without
//!    network access, concurrently. Results are displayable immediately.
//! 2. **Full stage**: each non-terminal signature is re-verified with
//!    revocation and timestamp checks, which go over the network through the
//!    revocation proxy. The result replaces the quick one.
//!
//! Parsing and the cryptography itself are delegated to external
//! collaborators behind [`ContainerParser`] and [`SignatureVerifier`].
//! [`VerificationSession`] is the caller-side driver that ties both stages to
//! a viewing session and discards results of superseded runs.

pub mod collaborator;
pub mod config;
pub mod coverage;
pub mod error;
pub mod event;
pub mod loader;
pub mod orchestrator;
pub mod reconcile;
pub mod session;
pub mod signer;

pub use collaborator::{ContainerParser, SignatureVerifier, VerifierHandle};
pub use config::VerificationConfig;
pub use coverage::{all_documents_signed, unsigned_documents};
pub use error::{VerificationError, VerifierError};
pub use event::{EventBus, VerificationEvent};
pub use loader::VerifierLoader;
pub use orchestrator::EdocVerifier;
pub use session::{SessionOutcome, VerificationSession};
pub use signer::extract_signer_info;
