//! Error types for the generation backends.

use thiserror::Error;

/// Errors that can occur when asking a backend for generated text.
///
/// The pipeline never propagates these; the interpreter turns them into a
/// degraded analysis.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// HTTP request failed (connection, timeout, body decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned an error response.
    #[error("API error ({error_type}): {message}")]
    Api {
        /// Error type reported by the backend, or the HTTP status.
        error_type: String,
        /// Error message.
        message: String,
    },

    /// Rate limited by the backend.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse the backend's reply envelope.
    #[error("parse error: {0}")]
    Parse(String),

    /// Reply contained no text block.
    #[error("backend returned no text content")]
    EmptyResponse,

    /// The HTTP client could not be built (e.g. credential is not a valid header).
    #[error("client setup error: {0}")]
    Client(String),
}

/// Error envelope shared by the Anthropic and OpenAI-compatible APIs.
///
/// Anthropic nests `{type, message}` under `error` with a top-level `type`;
/// OpenAI-compatible gateways nest `{message, type, code}`.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Nested error details.
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    /// Error type.
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    /// Error message.
    pub message: String,
}
