//! Error types for Verifyd
//!
//! This module defines all error types used throughout the Verifyd client.
//! Uses `thiserror` for ergonomic error handling with automatic `Display` and
//! `Error` trait implementations.
//!
//! The ranking and aggregation core never produces these; they come from the
//! data layer (backend requests, configuration) and from form validation.

use thiserror::Error;

/// The primary error type for Verifyd operations.
#[derive(Error, Debug)]
pub enum VerifydError {
    /// Configuration-related errors (invalid config, missing backend URL, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend errors (non-success status, malformed payloads, RPC failures)
    #[error("Backend error: {0}")]
    Backend(String),

    /// User input rejected before it reached the backend
    #[error("Validation error: {0}")]
    Validation(String),

    /// Standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Resource not found (entities, reviews, verification requests, etc.)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authentication or row-level authorization failures
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// A specialized `Result` type for Verifyd operations.
pub type Result<T> = std::result::Result<T, VerifydError>;
