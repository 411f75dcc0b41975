//! HTTP server assembly and request routing.
//!
//! Builds the axum router over an immutable [`AppState`]: configuration,
//! the normalization pipeline (configured once at startup), and the
//! delivery client. Requests flow through request-id injection, tracing,
//! and timeout layers before reaching the handlers; the protected ingest
//! route additionally passes the basic-auth middleware.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use sluice_core::Pipeline;
use sluice_delivery::{DeliveryClient, StreamSink};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use uuid::Uuid;

use crate::{config::Config, handlers, middleware::auth::basic_auth_middleware};

/// Immutable per-process state shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Loaded service configuration.
    pub config: Arc<Config>,
    /// Normalization pipeline, configured once at startup.
    pub pipeline: Arc<Pipeline>,
    /// Delivery client over the injected stream sink.
    pub delivery: Arc<DeliveryClient>,
}

impl AppState {
    /// Builds the state over the given sink.
    ///
    /// The sink is injectable so tests can script delivery outcomes;
    /// production passes an `HttpStreamSink`.
    pub fn new(config: Config, sink: Arc<dyn StreamSink>) -> Self {
        let policy = config.to_backoff_policy();

        Self {
            pipeline: Arc::new(Pipeline::new().flatten()),
            delivery: Arc::new(DeliveryClient::new(sink, policy)),
            config: Arc::new(config),
        }
    }
}

/// Creates the axum router with all routes and middleware.
///
/// Mounts `/ingest` unconditionally and `/ingest/secure` only when basic
/// auth credentials are configured.
pub fn create_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/live", get(handlers::liveness_check));

    let mut ingest_routes = Router::new().route("/ingest", post(handlers::ingest_webhook));

    if let Some(auth) = state.config.basic_auth() {
        ingest_routes = ingest_routes.route(
            "/ingest/secure",
            post(handlers::ingest_webhook)
                .layer(middleware::from_fn_with_state(auth, basic_auth_middleware)),
        );
    }

    Router::new()
        .merge(health_routes)
        .merge(ingest_routes)
        .layer(TimeoutLayer::new(Duration::from_secs(state.config.request_timeout)))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(inject_request_id))
        .with_state(state)
}

/// Middleware to inject a request ID into all responses.
///
/// Adds an `X-Request-Id` header for tracing requests across services.
async fn inject_request_id(req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();

    let mut req = req;
    req.extensions_mut().insert(request_id.clone());

    let mut response = next.run(req).await;

    if let Ok(header_value) = request_id.parse() {
        response.headers_mut().insert("X-Request-Id", header_value);
    }

    response
}

/// Starts the HTTP server with graceful shutdown support.
///
/// Binds to the specified address and serves requests until a shutdown
/// signal is received.
///
/// # Errors
///
/// Returns `std::io::Error` if the port is already in use or the network
/// interface is unavailable.
pub async fn start_server(state: AppState, addr: SocketAddr) -> Result<(), std::io::Error> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("HTTP server listening on {}", actual_addr);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("HTTP server stopped gracefully");
    Ok(())
}

/// Waits for a shutdown signal (CTRL+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received CTRL+C, starting graceful shutdown");
        },
        () = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
