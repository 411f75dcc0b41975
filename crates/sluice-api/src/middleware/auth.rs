//! Basic-auth middleware for the protected ingest route.
//!
//! Parses the `Authorization: Basic` header, decodes the credential token,
//! and compares it against the configured username and password. All
//! failure modes answer 401 with a `WWW-Authenticate` challenge; the
//! specific reason is logged, not disclosed to the caller.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::warn;

/// Credentials the protected ingest route is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuthConfig {
    /// Expected username.
    pub username: String,
    /// Expected password.
    pub password: String,
}

/// Errors that can occur during basic-auth validation.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// The Authorization header is missing from the request.
    MissingHeader,
    /// The Authorization header does not use the Basic scheme.
    UnsupportedScheme,
    /// The credential token is not valid base64 or UTF-8.
    InvalidToken,
    /// The decoded token is not exactly `username:password`.
    MalformedCredentials,
    /// Username or password did not match the configured values.
    InvalidCredentials,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        warn!(reason = ?self, "basic auth check failed");

        (
            StatusCode::UNAUTHORIZED,
            [("WWW-Authenticate", r#"Basic realm="Login Required""#)],
            "Could not verify your access level for that URL. \
             You have to login with proper credentials",
        )
            .into_response()
    }
}

/// Extracts the Basic credential token from the Authorization header.
fn extract_basic_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingHeader)?;

    auth.strip_prefix("Basic ").ok_or(AuthError::UnsupportedScheme)
}

/// Decodes the token and compares it against the configured credentials.
fn verify_credentials(config: &BasicAuthConfig, token: &str) -> Result<(), AuthError> {
    let decoded = BASE64.decode(token).map_err(|_| AuthError::InvalidToken)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::InvalidToken)?;

    let parts: Vec<&str> = decoded.split(':').collect();
    if parts.len() != 2 {
        return Err(AuthError::MalformedCredentials);
    }

    if parts[0] != config.username || parts[1] != config.password {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(())
}

/// Axum middleware enforcing basic auth on the routes it wraps.
pub async fn basic_auth_middleware(
    State(config): State<BasicAuthConfig>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_basic_token(req.headers())?;
    verify_credentials(&config, token)?;

    Ok(next.run(req).await)
}
