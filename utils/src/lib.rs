//! Shared utilities for the eDoc verification workspace.

pub mod logging;
pub mod time;

pub use logging::{init_logging, init_tracing, LogFormat};
pub use time::{format_signing_time, format_signing_time_in};
