//! Nullable container parser — hands out a fixed container.

use edoc_types::Container;
use edoc_verification::{ContainerParser, VerifierError};
use std::sync::Mutex;

pub struct NullParser {
    outcome: Result<Container, String>,
    calls: Mutex<usize>,
}

impl NullParser {
    /// Every parse returns a copy of `container`.
    pub fn new(container: Container) -> Self {
        Self {
            outcome: Ok(container),
            calls: Mutex::new(0),
        }
    }

    /// Every parse fails as malformed input with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl ContainerParser for NullParser {
    fn parse_container(&self, _bytes: &[u8]) -> Result<Container, VerifierError> {
        *self.calls.lock().unwrap() += 1;
        self.outcome.clone().map_err(VerifierError::Malformed)
    }
}
