//! Scripted stream sink for deterministic delivery tests.

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Mutex,
};

use async_trait::async_trait;
use bytes::Bytes;
use sluice_delivery::{DeliveryError, RecordAck, Result, StreamSink};

/// In-memory [`StreamSink`] that fails a scripted number of times before
/// accepting records, and records every publish attempt it sees.
///
/// ```
/// use sluice_testing::MockStreamSink;
///
/// let sink = MockStreamSink::failing_times(1);
/// assert_eq!(sink.attempts(), 0);
/// ```
pub struct MockStreamSink {
    attempts: AtomicU32,
    failures_remaining: AtomicU32,
    error: DeliveryError,
    published: Mutex<Vec<(String, Bytes)>>,
}

impl MockStreamSink {
    /// A sink that accepts every record.
    pub fn succeeding() -> Self {
        Self::failing_times(0)
    }

    /// A sink that fails the first `count` publish calls, then accepts.
    pub fn failing_times(count: u32) -> Self {
        Self {
            attempts: AtomicU32::new(0),
            failures_remaining: AtomicU32::new(count),
            error: DeliveryError::service(500, "scripted failure"),
            published: Mutex::new(Vec::new()),
        }
    }

    /// A sink that fails every publish call.
    pub fn always_failing() -> Self {
        Self::failing_times(u32::MAX)
    }

    /// Overrides the error returned by scripted failures.
    #[must_use]
    pub fn with_error(mut self, error: DeliveryError) -> Self {
        self.error = error;
        self
    }

    /// Number of publish calls observed so far.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Successfully published `(stream, payload)` pairs, in order.
    pub fn published(&self) -> Vec<(String, Bytes)> {
        self.published.lock().expect("sink lock poisoned").clone()
    }
}

#[async_trait]
impl StreamSink for MockStreamSink {
    async fn put_record(&self, stream: &str, data: Bytes) -> Result<RecordAck> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;

        let scripted_failure = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok();

        if scripted_failure {
            return Err(self.error.clone());
        }

        self.published.lock().expect("sink lock poisoned").push((stream.to_string(), data));
        Ok(RecordAck { record_id: Some(format!("rec-{attempt}")) })
    }
}
