use thiserror::Error;

/// Failure reported by an external collaborator.
#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("verifier unavailable: {0}")]
    Unavailable(String),

    #[error("malformed container: {0}")]
    Malformed(String),

    #[error("signature {0} not found in container")]
    SignatureNotFound(usize),

    #[error("network error: {0}")]
    Network(String),

    #[error("verifier panicked")]
    Panicked,

    #[error("{0}")]
    Other(String),
}

/// Hard failures that abort a whole verification run.
///
/// Per-signature problems never surface here; they become `failed` results.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("Failed to parse eDoc file: {0}")]
    Parse(String),

    #[error("Failed to verify signatures: {0}")]
    Unavailable(String),

    #[error("config error: {0}")]
    Config(String),
}
