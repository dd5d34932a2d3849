//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator (container parser, signature verifier,
//! destination servers, telemetry collector) is abstracted behind a trait.
//! This crate provides test-friendly implementations that:
//! - Return scripted values
//! - Record what they were asked to do
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod fixtures;
pub mod parser;
pub mod telemetry;
pub mod upstream;
pub mod verifier;

pub use fixtures::{container, signature, signature_by, verifier_handle};
pub use parser::NullParser;
pub use telemetry::NullTelemetry;
pub use upstream::NullUpstream;
pub use verifier::{full_result, NullVerifier, VerifyCall};
