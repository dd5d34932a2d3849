//! Caller-side driver for one viewing session.
//!
//! Opening a file starts a new *generation*. Results of an older generation
//! that resolve after a newer file was opened (or after [`reset`]) are
//! dropped: no event is published for them and the run reports
//! [`SessionOutcome::Superseded`].
//!
//! [`reset`]: VerificationSession::reset

use edoc_types::SignatureValidationResult;
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::VerificationError;
use crate::event::{EventBus, VerificationEvent};
use crate::orchestrator::EdocVerifier;

/// How a run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Final per-signature results, in signature order.
    Completed(Vec<SignatureValidationResult>),
    /// A newer run started before this one finished.
    Superseded,
}

pub struct VerificationSession {
    verifier: Arc<EdocVerifier>,
    events: Arc<EventBus>,
    generation: AtomicU64,
}

impl VerificationSession {
    pub fn new(verifier: Arc<EdocVerifier>, events: Arc<EventBus>) -> Self {
        Self {
            verifier,
            events,
            generation: AtomicU64::new(0),
        }
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Invalidate every in-flight run ("go back"). Returns the new generation.
    pub fn reset(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.current_generation() == generation
    }

    fn publish(&self, generation: u64, event: VerificationEvent) -> bool {
        if !self.is_current(generation) {
            debug!(generation, "dropping event of superseded run");
            return false;
        }
        self.events.emit(&event);
        true
    }

    /// Parse `bytes`, run the Quick stage, then the Full stage for every
    /// non-terminal signature, publishing each transition.
    ///
    /// Full results are published as they arrive, in no particular order.
    pub async fn open(&self, bytes: &[u8]) -> Result<SessionOutcome, VerificationError> {
        let generation = self.reset();
        info!(generation, size = bytes.len(), "opening container");

        let container = match self.verifier.parse_container(bytes).await {
            Ok(container) => container,
            Err(e) => return self.fail(generation, e),
        };
        let parsed = VerificationEvent::ContainerParsed {
            generation,
            documents: container.document_file_list.clone(),
            signature_count: container.signature_count(),
        };
        if !self.publish(generation, parsed) {
            return Ok(SessionOutcome::Superseded);
        }

        let quick = match self.verifier.verify_quick(&container).await {
            Ok(results) => results,
            Err(e) => return self.fail(generation, e),
        };
        let quick_done = VerificationEvent::QuickCompleted {
            generation,
            results: quick.clone(),
        };
        if !self.publish(generation, quick_done) {
            return Ok(SessionOutcome::Superseded);
        }

        let mut results = quick.clone();
        let mut pending: FuturesUnordered<_> = quick
            .iter()
            .filter(|result| !result.is_terminal())
            .map(|result| {
                self.verifier
                    .verify_full(&container, result.signature_index, result)
            })
            .collect();

        while let Some(full) = pending.next().await {
            let index = full.signature_index;
            let updated = VerificationEvent::SignatureUpdated {
                generation,
                result: full.clone(),
            };
            if !self.publish(generation, updated) {
                return Ok(SessionOutcome::Superseded);
            }
            results[index] = full;
        }

        info!(generation, signatures = results.len(), "verification finished");
        Ok(SessionOutcome::Completed(results))
    }

    fn fail(
        &self,
        generation: u64,
        error: VerificationError,
    ) -> Result<SessionOutcome, VerificationError> {
        let event = VerificationEvent::Failed {
            generation,
            error: error.to_string(),
        };
        if self.publish(generation, event) {
            Err(error)
        } else {
            Ok(SessionOutcome::Superseded)
        }
    }
}
