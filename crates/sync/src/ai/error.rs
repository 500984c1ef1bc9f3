//! Error types for the generation client.

use thiserror::Error;

/// Errors that can occur when calling the generation service.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request failed (includes photo fetches and timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error body, truncated.
        message: String,
    },

    /// A required input was missing; nothing was sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The model answered with text where an image was required.
    #[error("model returned text instead of an image: {0}")]
    NoImage(String),

    /// The model returned no usable content at all.
    #[error("empty response from model")]
    Empty,

    /// The returned image payload was not valid base64.
    #[error("image decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The response body was not the expected shape.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
