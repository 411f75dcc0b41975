//! Test infrastructure shared by the Sluice crates.
//!
//! Provides a scripted stream sink that records every publish attempt, and
//! payload fixtures for exercising the normalization pipeline end to end.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod sink;

pub use fixtures::{nested_order_payload, simple_payload};
pub use sink::MockStreamSink;
