//! Webhook ingestion handler.
//!
//! Decodes the inbound body, runs the normalization pipeline, and forwards
//! the flat record to the delivery client. Outcomes map to the response
//! contract: 200 `{"message":"OK"}` on a fully successful cycle, 500
//! `{"message":"FAIL"}` on any decode, transform, or delivery failure.
//! Authentication failures never reach this handler; the middleware
//! answers them with 401.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, error, info, instrument};

use crate::{decode::decode_body, server::AppState};

/// Body of both success and failure responses.
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    /// `"OK"` or `"FAIL"`
    pub message: &'static str,
}

fn ok_response() -> Response {
    (StatusCode::OK, Json(StatusMessage { message: "OK" })).into_response()
}

fn fail_response() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(StatusMessage { message: "FAIL" })).into_response()
}

/// Ingests one webhook event and forwards it to the stream.
#[instrument(name = "ingest_webhook", skip(state, headers, body), fields(body_bytes = body.len()))]
pub async fn ingest_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers.get("content-type").and_then(|v| v.to_str().ok());

    let record = match decode_body(content_type, &body) {
        Ok(record) => record,
        Err(e) => {
            error!(
                error = %e,
                content_type = content_type.unwrap_or("none"),
                "failed decoding webhook body"
            );
            return fail_response();
        },
    };

    debug!(keys = record.len(), "webhook body decoded");

    // Transform failures are data-shape errors; they are reported, never
    // retried.
    let flat = match state.pipeline.apply(&record) {
        Ok(flat) => flat,
        Err(e) => {
            error!(error = %e, "record transform failed");
            return fail_response();
        },
    };

    match state.delivery.deliver(&flat, &state.config.delivery_stream_name).await {
        Ok(ack) => {
            info!(record_id = ?ack.record_id, "webhook forwarded to stream");
            ok_response()
        },
        Err(e) => {
            error!(error = %e, "webhook delivery failed");
            fail_response()
        },
    }
}
