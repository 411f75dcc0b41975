//! Downstream stream sink abstraction and its HTTP implementation.
//!
//! The delivery client talks to the stream service through [`StreamSink`],
//! which tests replace with a scripted implementation. [`HttpStreamSink`]
//! is the production sink: it POSTs newline-framed records to the stream
//! ingestion endpoint and categorizes failures for the retry loop.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DeliveryError, Result};

/// Acknowledgment returned by the stream service for one accepted record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecordAck {
    /// Identifier the service assigned to the record, when it reports one.
    pub record_id: Option<String>,
}

/// A downstream stream that accepts single records.
///
/// Implementations must be safe to share across request handlers; the
/// handle is constructed once at startup and treated as immutable.
#[async_trait]
pub trait StreamSink: Send + Sync {
    /// Publishes one framed record to the named stream.
    async fn put_record(&self, stream: &str, data: Bytes) -> Result<RecordAck>;
}

/// Configuration for the HTTP stream sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Base URL of the stream ingestion service.
    pub endpoint: String,
    /// Timeout for a single publish request.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:4573".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: "Sluice/1.0".to_string(),
        }
    }
}

/// HTTP sink publishing records to `{endpoint}/streams/{stream}/records`.
///
/// The underlying reqwest client is built lazily on first publish and then
/// reused for the lifetime of the sink; configuration problems surface as
/// [`DeliveryError::Configuration`] on that first call.
#[derive(Debug)]
pub struct HttpStreamSink {
    config: SinkConfig,
    client: OnceCell<reqwest::Client>,
}

impl HttpStreamSink {
    /// Creates a sink for the configured ingestion service.
    pub fn new(config: SinkConfig) -> Self {
        Self { config, client: OnceCell::new() }
    }

    /// Creates a sink with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SinkConfig::default())
    }

    fn http(&self) -> Result<&reqwest::Client> {
        self.client.get_or_try_init(|| {
            debug!(endpoint = %self.config.endpoint, "building stream sink HTTP client");
            reqwest::Client::builder()
                .timeout(self.config.timeout)
                .user_agent(&self.config.user_agent)
                .build()
                .map_err(|e| {
                    DeliveryError::configuration(format!("failed to build HTTP client: {e}"))
                })
        })
    }

    fn record_url(&self, stream: &str) -> String {
        format!("{}/streams/{stream}/records", self.config.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl StreamSink for HttpStreamSink {
    async fn put_record(&self, stream: &str, data: Bytes) -> Result<RecordAck> {
        let url = self.record_url(stream);

        let response = match self
            .http()?
            .post(&url)
            .header("content-type", "application/x-ndjson")
            .body(data)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                if e.is_timeout() {
                    return Err(DeliveryError::timeout(self.config.timeout.as_secs()));
                }
                if e.is_connect() {
                    return Err(DeliveryError::network(format!("connection failed: {e}")));
                }
                return Err(DeliveryError::network(e.to_string()));
            },
        };

        let status = response.status();
        if status.is_success() {
            // Acknowledgment body is optional; an empty or non-JSON body is
            // still a successful publish.
            let ack = response.json::<RecordAck>().await.unwrap_or_default();
            debug!(stream, record_id = ?ack.record_id, "record accepted by stream");
            return Ok(ack);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(stream, status = status.as_u16(), "stream service rejected record");
        Err(DeliveryError::service(status.as_u16(), truncate_body(&body)))
    }
}

/// Bounds the stored response body so a misbehaving service cannot bloat
/// error values and logs.
fn truncate_body(body: &str) -> String {
    const MAX_BODY: usize = 1024;

    if body.len() <= MAX_BODY {
        return body.to_string();
    }

    let mut end = MAX_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated)", &body[..end])
}

#[cfg(test)]
mod tests {
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    use super::*;

    fn sink_for(server: &MockServer) -> HttpStreamSink {
        HttpStreamSink::new(SinkConfig { endpoint: server.uri(), ..SinkConfig::default() })
    }

    #[tokio::test]
    async fn successful_publish_returns_ack() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/streams/intake-events/records"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "record_id": "rec-001"
                })),
            )
            .mount(&server)
            .await;

        let sink = sink_for(&server);
        let ack = sink
            .put_record("intake-events", Bytes::from_static(b"{\"a\":1}\n"))
            .await
            .expect("publish succeeds");

        assert_eq!(ack.record_id.as_deref(), Some("rec-001"));
    }

    #[tokio::test]
    async fn ack_body_is_optional() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let sink = sink_for(&server);
        let ack = sink
            .put_record("intake-events", Bytes::from_static(b"{}\n"))
            .await
            .expect("publish succeeds");

        assert_eq!(ack.record_id, None);
    }

    #[tokio::test]
    async fn service_rejection_carries_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("shard unavailable"))
            .mount(&server)
            .await;

        let sink = sink_for(&server);
        let error = sink
            .put_record("intake-events", Bytes::from_static(b"{}\n"))
            .await
            .expect_err("publish fails");

        match error {
            DeliveryError::Service { status_code, body } => {
                assert_eq!(status_code, 503);
                assert_eq!(body, "shard unavailable");
            },
            other => panic!("expected service error, got {other}"),
        }
    }

    #[tokio::test]
    async fn connection_failure_is_network_error() {
        // Nothing listens on this port.
        let sink = HttpStreamSink::new(SinkConfig {
            endpoint: "http://127.0.0.1:1".to_string(),
            timeout: Duration::from_secs(1),
            ..SinkConfig::default()
        });

        let error = sink
            .put_record("intake-events", Bytes::from_static(b"{}\n"))
            .await
            .expect_err("publish fails");

        assert!(matches!(error, DeliveryError::Network { .. } | DeliveryError::Timeout { .. }));
    }

    #[tokio::test]
    async fn payload_is_forwarded_verbatim() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::body_string("{\"a_b\":1}\n"))
            .and(matchers::header("content-type", "application/x-ndjson"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let sink = sink_for(&server);
        sink.put_record("intake-events", Bytes::from_static(b"{\"a_b\":1}\n"))
            .await
            .expect("publish succeeds");
    }

    #[test]
    fn record_url_handles_trailing_slash() {
        let sink = HttpStreamSink::new(SinkConfig {
            endpoint: "http://stream.internal/".to_string(),
            ..SinkConfig::default()
        });

        assert_eq!(sink.record_url("events"), "http://stream.internal/streams/events/records");
    }

    #[test]
    fn long_response_bodies_are_truncated() {
        let body = "x".repeat(4096);
        let stored = truncate_body(&body);

        assert!(stored.len() < body.len());
        assert!(stored.ends_with("... (truncated)"));
    }
}
