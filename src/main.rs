//! Sluice webhook intake service.
//!
//! Main entry point. Loads configuration, initializes logging, constructs
//! the stream sink, and serves the intake API until shutdown.

use std::sync::Arc;

use anyhow::{Context, Result};
use sluice_api::{AppState, Config, LogFormat};
use sluice_delivery::HttpStreamSink;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first: logging options come from it, and a missing
    // stream name must fail the process before anything else starts.
    let config = Config::load()?;

    init_tracing(&config)?;

    info!("Starting Sluice webhook intake service");
    info!(
        stream = %config.delivery_stream_name,
        endpoint = %config.stream_endpoint,
        max_retries = config.max_retry_attempts,
        secure_ingest = config.basic_auth().is_some(),
        "Configuration loaded"
    );

    let sink = Arc::new(HttpStreamSink::new(config.to_sink_config()));
    let state = AppState::new(config, sink);

    let addr = state.config.parse_server_addr()?;
    info!(addr = %addr, "Sluice is ready to receive webhooks");

    sluice_api::start_server(state, addr).await.context("server failed")?;

    info!("Sluice shutdown complete");
    Ok(())
}

/// Initializes tracing once at process start from explicit configuration.
fn init_tracing(config: &Config) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_new(&config.rust_log)
        .with_context(|| format!("invalid log filter {:?}", config.rust_log))?;

    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => {
            registry.with(fmt::layer().json()).init();
        },
        LogFormat::Text => {
            let layer = fmt::layer().with_target(true).with_file(true).with_line_number(true);
            registry.with(layer).init();
        },
    }

    Ok(())
}
