//! Record Protocol Tests
//!
//! End-to-end tests through the public API, organized by concern:
//! - Lifecycle: set-once fields, locking, property status
//! - Gateway: validation, strict creation, text construction, config
//! - Serialization: plain and token-wrapped text, nested records
//! - Equality: comparison reports
//! - Properties: round-trip and equality laws (proptest)
//! - Concurrency: shared gateway and shared instances

#[path = "../common/mod.rs"]
mod common;

mod equality;
mod gateway;
mod properties;
