//! Middleware for the intake API.

pub mod auth;
