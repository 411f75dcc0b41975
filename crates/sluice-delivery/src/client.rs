//! Delivery client wrapping the sink with bounded retry.
//!
//! One `deliver` call frames the record and drives it through the retry
//! loop: ATTEMPTING → SUCCEEDED on ack, ATTEMPTING → BACKOFF → ATTEMPTING
//! on failure with budget remaining, ATTEMPTING → EXHAUSTED once the budget
//! hits zero. Exhaustion returns the last sink error unchanged.

use std::sync::Arc;

use bytes::Bytes;
use sluice_core::FlatRecord;
use tracing::{error, info, instrument, warn};

use crate::{
    error::{DeliveryError, ErrorCategory, Result},
    retry::BackoffPolicy,
    sink::{RecordAck, StreamSink},
};

/// Publishes flat records to a stream with randomized-backoff retry.
///
/// The client is cheap to clone and safe to share: the sink handle and the
/// policy are both immutable after construction.
#[derive(Clone)]
pub struct DeliveryClient {
    sink: Arc<dyn StreamSink>,
    policy: BackoffPolicy,
}

impl DeliveryClient {
    /// Creates a client over the given sink and retry policy.
    pub fn new(sink: Arc<dyn StreamSink>, policy: BackoffPolicy) -> Self {
        Self { sink, policy }
    }

    /// The retry policy this client applies.
    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Delivers one flat record to the named stream.
    ///
    /// Frames the record as newline-terminated JSON and publishes it,
    /// retrying on any sink error until the budget is exhausted. Retries
    /// are bounded by attempt count only; there is no overall deadline.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Serialization`] if the record cannot be
    /// framed, or the last sink error once the retry budget is exhausted.
    #[instrument(name = "stream_delivery", skip_all, fields(stream = %stream))]
    pub async fn deliver(&self, record: &FlatRecord, stream: &str) -> Result<RecordAck> {
        let payload = Bytes::from(
            record.to_wire().map_err(|e| DeliveryError::serialization(e.to_string()))?,
        );

        let mut retries_remaining = self.policy.max_retries;
        let mut attempt: u32 = 1;

        loop {
            match self.sink.put_record(stream, payload.clone()).await {
                Ok(ack) => {
                    info!(attempt, record_id = ?ack.record_id, "record delivered to stream");
                    return Ok(ack);
                },
                Err(e) => {
                    error!(
                        attempt,
                        category = %ErrorCategory::from(&e),
                        error = %e,
                        "failed writing record to stream"
                    );

                    if retries_remaining == 0 {
                        warn!(attempts = attempt, "retry budget exhausted, giving up");
                        return Err(e);
                    }

                    let delay = self.policy.delay();
                    tokio::time::sleep(delay).await;
                    retries_remaining -= 1;
                    attempt += 1;

                    warn!(
                        slept_ms = delay.as_millis() as u64,
                        retries_remaining,
                        "retrying stream delivery"
                    );
                },
            }
        }
    }
}

impl std::fmt::Debug for DeliveryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryClient").field("policy", &self.policy).finish_non_exhaustive()
    }
}
