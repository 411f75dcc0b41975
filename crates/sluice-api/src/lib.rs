//! Sluice HTTP API.
//!
//! Assembles the intake surface: configuration loading, request body
//! decoding, basic-auth middleware, ingest and health handlers, and the
//! router with its middleware stack.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod decode;
pub mod handlers;
pub mod middleware;
pub mod server;

pub use config::{Config, LogFormat};
pub use server::{create_router, start_server, AppState};
