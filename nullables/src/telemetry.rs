//! Nullable telemetry sink — keeps events in memory.

use edoc_proxy::{ProxyLogEvent, TelemetrySink};
use std::sync::Mutex;

#[derive(Default)]
pub struct NullTelemetry {
    events: Mutex<Vec<ProxyLogEvent>>,
}

impl NullTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProxyLogEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl TelemetrySink for NullTelemetry {
    fn record(&self, event: ProxyLogEvent) {
        self.events.lock().unwrap().push(event);
    }
}
