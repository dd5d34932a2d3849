//! Events published by a [`VerificationSession`](crate::VerificationSession).

use edoc_types::SignatureValidationResult;

/// State transitions of a verification run. Every event carries the
/// generation of the run that produced it.
#[derive(Clone, Debug)]
pub enum VerificationEvent {
    /// The container was parsed.
    ContainerParsed {
        generation: u64,
        documents: Vec<String>,
        signature_count: usize,
    },
    /// Crypto-only results for every signature are available.
    QuickCompleted {
        generation: u64,
        results: Vec<SignatureValidationResult>,
    },
    /// One signature's full result replaces its quick result.
    SignatureUpdated {
        generation: u64,
        result: SignatureValidationResult,
    },
    /// The run could not continue (parse failure, verifier unavailable).
    Failed { generation: u64, error: String },
}

impl VerificationEvent {
    pub fn generation(&self) -> u64 {
        match self {
            Self::ContainerParsed { generation, .. }
            | Self::QuickCompleted { generation, .. }
            | Self::SignatureUpdated { generation, .. }
            | Self::Failed { generation, .. } => *generation,
        }
    }
}

/// Synchronous fan-out listener registry.
///
/// Listeners run inline on the publishing task; keep them fast. Each session
/// gets its own bus, so independent sessions never see each other's events.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&VerificationEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&VerificationEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &VerificationEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
