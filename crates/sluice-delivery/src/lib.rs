//! Stream delivery with bounded randomized-backoff retry.
//!
//! This crate publishes flattened records to a downstream streaming
//! ingestion endpoint and recovers from transient failures. The downstream
//! is abstracted behind the [`StreamSink`] trait so tests can inject a
//! scripted sink; production uses [`HttpStreamSink`], whose HTTP client is
//! built lazily on first use and immutable afterwards.
//!
//! # Delivery lifecycle
//!
//! One [`DeliveryClient::deliver`] call frames the record, then loops:
//! attempt the publish, and on failure either give up (budget exhausted,
//! the last sink error is returned) or sleep a randomized backoff interval
//! and try again. Attempts are bounded by count, not wall-clock time, and
//! every failure and retry is logged.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use sluice_core::Pipeline;
//! use sluice_delivery::{BackoffPolicy, DeliveryClient, HttpStreamSink, SinkConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sink = Arc::new(HttpStreamSink::new(SinkConfig::default()));
//! let client = DeliveryClient::new(sink, BackoffPolicy::default());
//!
//! let flat = Pipeline::new().flatten().apply(&sluice_core::Record::new())?;
//! client.deliver(&flat, "intake-events").await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod retry;
pub mod sink;

pub use client::DeliveryClient;
pub use error::{DeliveryError, ErrorCategory, Result};
pub use retry::BackoffPolicy;
pub use sink::{HttpStreamSink, RecordAck, SinkConfig, StreamSink};

/// Default number of retries after the initial publish attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 10;

/// Default fixed floor of the backoff interval, in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 2000;

/// Default span of the uniform random backoff component, in milliseconds.
pub const DEFAULT_JITTER_SPAN_MS: u64 = 2000;
