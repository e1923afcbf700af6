//! Error types for the `lectern-model` crate.

use thiserror::Error;

/// Errors that can occur when talking to a language model backend.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The backend returned a non-success status.
    #[error("API error ({provider}, {status}): {message}")]
    Api {
        /// The model provider that produced the error.
        provider: String,
        /// The HTTP status code returned.
        status: u16,
        /// The error detail from the response body, if any.
        message: String,
    },

    /// The request could not be sent or timed out.
    #[error("Request error ({provider}): {message}")]
    Request {
        /// The model provider the request was addressed to.
        provider: String,
        /// A description of the transport failure.
        message: String,
    },

    /// The backend responded, but not in the expected shape.
    #[error("Invalid response ({provider}): {message}")]
    InvalidResponse {
        /// The model provider that produced the response.
        provider: String,
        /// A description of what was malformed.
        message: String,
    },

    /// A required credential was not provided.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
