//! Configuration management for the Sluice intake service.

use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use sluice_delivery::{BackoffPolicy, SinkConfig};

use crate::middleware::auth::BasicAuthConfig;

const CONFIG_FILE: &str = "config.toml";

/// Output format for process-wide logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable line output.
    Text,
    /// One JSON object per event.
    Json,
}

/// Complete service configuration with defaults, file, and environment
/// overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables (highest priority)
/// 2. Configuration file (`config.toml`)
/// 3. Built-in defaults (lowest priority)
///
/// The only value without a usable default is `delivery_stream_name`:
/// loading
/// fails fast when it is absent or empty, since the service cannot forward
/// records anywhere without it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Delivery
    /// Name of the downstream stream records are published to.
    ///
    /// Environment variable: `DELIVERY_STREAM_NAME`. Required.
    #[serde(default, alias = "DELIVERY_STREAM_NAME")]
    pub delivery_stream_name: String,
    /// Base URL of the stream ingestion service.
    ///
    /// Environment variable: `STREAM_ENDPOINT`
    #[serde(default = "default_stream_endpoint", alias = "STREAM_ENDPOINT")]
    pub stream_endpoint: String,
    /// Timeout for a single publish request in seconds.
    ///
    /// Environment variable: `DELIVERY_TIMEOUT_SECONDS`
    #[serde(default = "default_delivery_timeout", alias = "DELIVERY_TIMEOUT_SECONDS")]
    pub delivery_timeout_seconds: u64,

    // Retry
    /// Retries allowed after the initial publish attempt.
    ///
    /// Environment variable: `MAX_RETRY_ATTEMPTS`
    #[serde(default = "default_retry_attempts", alias = "MAX_RETRY_ATTEMPTS")]
    pub max_retry_attempts: u32,
    /// Fixed floor of the backoff interval in milliseconds.
    ///
    /// Environment variable: `RETRY_BASE_DELAY_MS`
    #[serde(default = "default_base_delay_ms", alias = "RETRY_BASE_DELAY_MS")]
    pub retry_base_delay_ms: u64,
    /// Span of the uniform random backoff component in milliseconds.
    ///
    /// Environment variable: `RETRY_JITTER_MS`
    #[serde(default = "default_jitter_ms", alias = "RETRY_JITTER_MS")]
    pub retry_jitter_ms: u64,

    // Authentication
    /// Username for the basic-auth protected ingest route.
    ///
    /// Environment variable: `BASIC_AUTH_USERNAME`. Leaving both
    /// credentials empty disables the protected route.
    #[serde(default, alias = "BASIC_AUTH_USERNAME")]
    pub basic_auth_username: String,
    /// Password for the basic-auth protected ingest route.
    ///
    /// Environment variable: `BASIC_AUTH_PASSWORD`
    #[serde(default, alias = "BASIC_AUTH_PASSWORD")]
    pub basic_auth_password: String,

    // Server
    /// Server bind address.
    ///
    /// Environment variable: `HOST`
    #[serde(default = "default_host", alias = "HOST")]
    pub host: String,
    /// Server bind port.
    ///
    /// Environment variable: `PORT`
    #[serde(default = "default_port", alias = "PORT")]
    pub port: u16,
    /// HTTP request timeout in seconds.
    ///
    /// Environment variable: `REQUEST_TIMEOUT`
    #[serde(default = "default_request_timeout", alias = "REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    // Logging
    /// Log filter directive.
    ///
    /// Environment variable: `RUST_LOG`
    #[serde(default = "default_log_level", alias = "RUST_LOG")]
    pub rust_log: String,
    /// Log output format.
    ///
    /// Environment variable: `LOG_FORMAT` (`text` or `json`)
    #[serde(default = "default_log_format", alias = "LOG_FORMAT")]
    pub log_format: LogFormat,
}

impl Config {
    /// Loads configuration from defaults, `config.toml`, and environment
    /// variable overrides, then validates it.
    ///
    /// # Errors
    ///
    /// Fails when a source cannot be read or when validation rejects the
    /// merged result (missing stream name, half-configured credentials,
    /// zero port).
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(""));

        let config: Self = figment.extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Converts to the delivery crate's backoff policy.
    pub fn to_backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy {
            max_retries: self.max_retry_attempts,
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
            jitter_span: Duration::from_millis(self.retry_jitter_ms),
        }
    }

    /// Converts to the HTTP sink configuration.
    pub fn to_sink_config(&self) -> SinkConfig {
        SinkConfig {
            endpoint: self.stream_endpoint.clone(),
            timeout: Duration::from_secs(self.delivery_timeout_seconds),
            user_agent: "Sluice/1.0".to_string(),
        }
    }

    /// Credentials for the protected ingest route, when configured.
    pub fn basic_auth(&self) -> Option<BasicAuthConfig> {
        if self.basic_auth_username.is_empty() && self.basic_auth_password.is_empty() {
            return None;
        }

        Some(BasicAuthConfig {
            username: self.basic_auth_username.clone(),
            password: self.basic_auth_password.clone(),
        })
    }

    /// Parses the server socket address from host and port.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr_str).context("Invalid server address")
    }

    /// Validates configuration values.
    fn validate(&self) -> Result<()> {
        if self.delivery_stream_name.is_empty() {
            anyhow::bail!("delivery_stream is required (set DELIVERY_STREAM_NAME)");
        }

        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.stream_endpoint.is_empty() {
            anyhow::bail!("stream_endpoint must not be empty");
        }

        if self.basic_auth_username.is_empty() != self.basic_auth_password.is_empty() {
            anyhow::bail!(
                "basic auth requires both BASIC_AUTH_USERNAME and BASIC_AUTH_PASSWORD, \
                 or neither"
            );
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delivery_stream_name: String::new(),
            stream_endpoint: default_stream_endpoint(),
            delivery_timeout_seconds: default_delivery_timeout(),
            max_retry_attempts: default_retry_attempts(),
            retry_base_delay_ms: default_base_delay_ms(),
            retry_jitter_ms: default_jitter_ms(),
            basic_auth_username: String::new(),
            basic_auth_password: String::new(),
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            rust_log: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_stream_endpoint() -> String {
    "http://127.0.0.1:4573".to_string()
}

fn default_delivery_timeout() -> u64 {
    30
}

fn default_retry_attempts() -> u32 {
    sluice_delivery::DEFAULT_MAX_RETRIES
}

fn default_base_delay_ms() -> u64 {
    sluice_delivery::DEFAULT_BASE_DELAY_MS
}

fn default_jitter_ms() -> u64 {
    sluice_delivery::DEFAULT_JITTER_SPAN_MS
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Text
}
