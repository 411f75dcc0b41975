//! HTTP request handlers for the Sluice API.
//!
//! Handlers follow a consistent pattern: decode the body, run the
//! normalization pipeline, hand the flat record to the delivery client,
//! and map the outcome to the OK/FAIL response contract. Health probes
//! live alongside for orchestration systems.

pub mod health;
pub mod ingest;

pub use health::{health_check, liveness_check, readiness_check};
pub use ingest::ingest_webhook;
