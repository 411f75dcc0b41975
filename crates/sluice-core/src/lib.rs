//! Record model and normalization pipeline.
//!
//! Provides the decoded webhook payload type, the flattening transform that
//! turns arbitrarily nested payloads into ingestion-ready flat records, and
//! the transform pipeline that composes such steps. All other crates depend
//! on these foundational types.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod record;
pub mod transform;

pub use error::{Result, TransformError};
pub use record::{FlatRecord, Record, RAW_KEY};
pub use transform::{flatten, Pipeline};
